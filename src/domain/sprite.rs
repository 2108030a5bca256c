/// Sprite keys and their frame metadata.
/// Frame sizes and glyph art are queried via methods, not stored on
/// entities, so sprite semantics are centralized here.

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum SpriteKey {
    EnemyBug,
    CharBoy,
    Water,
    Stone,
    Grass,
}

/// Width of every glyph line, in terminal columns.
pub const GLYPH_W: usize = 6;

impl SpriteKey {
    /// Pixel frame (width, height). Entities take their bounds from this.
    pub fn frame(self) -> (f32, f32) {
        // every asset shares the 101x171 tile frame
        (101.0, 171.0)
    }

    /// Asset name, for log lines.
    pub fn name(self) -> &'static str {
        match self {
            SpriteKey::EnemyBug => "enemy-bug.png",
            SpriteKey::CharBoy  => "char-boy.png",
            SpriteKey::Water    => "water-block.png",
            SpriteKey::Stone    => "stone-block.png",
            SpriteKey::Grass    => "grass-block.png",
        }
    }

    /// Terminal art, one `GLYPH_W`-column string per line.
    /// Spaces are transparent.
    pub fn glyphs(self) -> &'static [&'static str] {
        match self {
            SpriteKey::EnemyBug => &["<oOOo>", " /\\/\\ "],
            SpriteKey::CharBoy  => &[" (\"\") ", " /||\\ "],
            SpriteKey::Water    => &["~ ~ ~ "],
            SpriteKey::Stone    => &["      "],
            SpriteKey::Grass    => &[" ,  \" "],
        }
    }
}
