/// Events emitted during a simulation step or a session transition.
/// The presentation layer consumes these for sound and logging.

#[derive(Clone, Debug, PartialEq)]
pub enum GameEvent {
    PlayerMoved,
    PlayerHit { lives_left: u32 },
    EnemyRespawned { index: usize },
    StageCleared { stage: u32, gained: u32 },
    GameWon { score: u32 },
    GameOver { score: u32 },
    Paused,
    Resumed,
    Restarted,
}
