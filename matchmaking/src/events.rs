use common::ids::PlayerId;

#[derive(Debug, Clone)]
pub enum MatchmakingEvent {
    MatchFound {
        mode: String,
        teams: Vec<Vec<PlayerId>>,
        quality: f64,
    },
    QueueTimeout {
        mode: String,
        player: PlayerId,
    },
}
