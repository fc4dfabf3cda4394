use std::net::SocketAddr;

use axum::{
    body::Body,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use once_cell::sync::OnceCell;
use prometheus::{
    register_histogram, register_int_counter, register_int_gauge, Encoder, Histogram, IntCounter,
    IntGauge, TextEncoder,
};
use tokio::net::TcpListener;
use tracing::error;

use crate::error::BoxError;

pub struct MatchmakingMetrics {
    pub players_queued_total: IntCounter,
    pub matches_formed_total: IntCounter,
    pub queue_timeouts_total: IntCounter,
    pub queue_depth: IntGauge,
    pub match_quality: Histogram,
}

pub struct ArenaMetrics {
    pub matches_created_total: IntCounter,
    pub matches_finished_total: IntCounter,
    pub active_matches: IntGauge,
    pub match_duration_seconds: Histogram,
}

pub struct TournamentMetrics {
    pub tournaments_created_total: IntCounter,
    pub active_tournaments: IntGauge,
    pub bracket_matches_completed_total: IntCounter,
}

pub struct WorldPvpMetrics {
    pub zone_flips_total: IntCounter,
    pub honor_awarded_total: IntCounter,
    pub flagged_players: IntGauge,
}

pub struct GuildWarMetrics {
    pub wars_declared_total: IntCounter,
    pub active_wars: IntGauge,
}

pub struct RatingMetrics {
    pub results_submitted_total: IntCounter,
    pub decay_passes_total: IntCounter,
}

pub struct LeaderboardMetrics {
    pub cache_hits_total: IntCounter,
    pub cache_misses_total: IntCounter,
    pub page_query_seconds: Histogram,
}

pub struct DispatcherMetrics {
    pub ticks_total: IntCounter,
    pub tick_duration_seconds: Histogram,
}

static MATCHMAKING: OnceCell<MatchmakingMetrics> = OnceCell::new();
static ARENA: OnceCell<ArenaMetrics> = OnceCell::new();
static TOURNAMENT: OnceCell<TournamentMetrics> = OnceCell::new();
static WORLD_PVP: OnceCell<WorldPvpMetrics> = OnceCell::new();
static GUILD_WAR: OnceCell<GuildWarMetrics> = OnceCell::new();
static RATING: OnceCell<RatingMetrics> = OnceCell::new();
static LEADERBOARD: OnceCell<LeaderboardMetrics> = OnceCell::new();
static DISPATCHER: OnceCell<DispatcherMetrics> = OnceCell::new();

pub fn matchmaking_metrics() -> &'static MatchmakingMetrics {
    MATCHMAKING.get_or_init(|| MatchmakingMetrics {
        players_queued_total: register_int_counter!(
            "matchmaking_players_queued_total",
            "Total players enqueued across all modes"
        )
        .expect("register matchmaking_players_queued_total"),
        matches_formed_total: register_int_counter!(
            "matchmaking_matches_formed_total",
            "Total matches formed by the matchmaker"
        )
        .expect("register matchmaking_matches_formed_total"),
        queue_timeouts_total: register_int_counter!(
            "matchmaking_queue_timeouts_total",
            "Total queue entries evicted for exceeding max queue time"
        )
        .expect("register matchmaking_queue_timeouts_total"),
        queue_depth: register_int_gauge!(
            "matchmaking_queue_depth",
            "Current number of players waiting across all queues"
        )
        .expect("register matchmaking_queue_depth"),
        match_quality: register_histogram!(
            "matchmaking_match_quality",
            "Quality score of formed matches",
            vec![0.0, 0.1, 0.2, 0.3, 0.4, 0.5, 0.6, 0.7, 0.8, 0.9, 1.0]
        )
        .expect("register matchmaking_match_quality"),
    })
}

pub fn arena_metrics() -> &'static ArenaMetrics {
    ARENA.get_or_init(|| ArenaMetrics {
        matches_created_total: register_int_counter!(
            "arena_matches_created_total",
            "Total arena matches created"
        )
        .expect("register arena_matches_created_total"),
        matches_finished_total: register_int_counter!(
            "arena_matches_finished_total",
            "Total arena matches that reached a terminal state"
        )
        .expect("register arena_matches_finished_total"),
        active_matches: register_int_gauge!(
            "arena_active_matches",
            "Arena matches currently not in a terminal state"
        )
        .expect("register arena_active_matches"),
        match_duration_seconds: register_histogram!(
            "arena_match_duration_seconds",
            "Wall-clock duration of arena matches",
            vec![30.0, 60.0, 120.0, 300.0, 600.0, 900.0, 1200.0]
        )
        .expect("register arena_match_duration_seconds"),
    })
}

pub fn tournament_metrics() -> &'static TournamentMetrics {
    TOURNAMENT.get_or_init(|| TournamentMetrics {
        tournaments_created_total: register_int_counter!(
            "tournament_created_total",
            "Total tournaments created"
        )
        .expect("register tournament_created_total"),
        active_tournaments: register_int_gauge!(
            "tournament_active",
            "Tournaments currently in registration or in progress"
        )
        .expect("register tournament_active"),
        bracket_matches_completed_total: register_int_counter!(
            "tournament_bracket_matches_completed_total",
            "Total bracket matches that reached a completed state"
        )
        .expect("register tournament_bracket_matches_completed_total"),
    })
}

pub fn world_pvp_metrics() -> &'static WorldPvpMetrics {
    WORLD_PVP.get_or_init(|| WorldPvpMetrics {
        zone_flips_total: register_int_counter!(
            "worldpvp_zone_flips_total",
            "Total zone control flips"
        )
        .expect("register worldpvp_zone_flips_total"),
        honor_awarded_total: register_int_counter!(
            "worldpvp_honor_awarded_total",
            "Total honor points awarded"
        )
        .expect("register worldpvp_honor_awarded_total"),
        flagged_players: register_int_gauge!(
            "worldpvp_flagged_players",
            "Players currently PvP flagged"
        )
        .expect("register worldpvp_flagged_players"),
    })
}

pub fn guild_war_metrics() -> &'static GuildWarMetrics {
    GUILD_WAR.get_or_init(|| GuildWarMetrics {
        wars_declared_total: register_int_counter!(
            "guildwar_declared_total",
            "Total guild wars declared"
        )
        .expect("register guildwar_declared_total"),
        active_wars: register_int_gauge!(
            "guildwar_active",
            "Guild wars currently active or in preparation"
        )
        .expect("register guildwar_active"),
    })
}

pub fn rating_metrics() -> &'static RatingMetrics {
    RATING.get_or_init(|| RatingMetrics {
        results_submitted_total: register_int_counter!(
            "rating_results_submitted_total",
            "Total match results submitted to the rating engine"
        )
        .expect("register rating_results_submitted_total"),
        decay_passes_total: register_int_counter!(
            "rating_decay_passes_total",
            "Total scheduled decay passes executed"
        )
        .expect("register rating_decay_passes_total"),
    })
}

pub fn leaderboard_metrics() -> &'static LeaderboardMetrics {
    LEADERBOARD.get_or_init(|| LeaderboardMetrics {
        cache_hits_total: register_int_counter!(
            "leaderboard_cache_hits_total",
            "Leaderboard page cache hits"
        )
        .expect("register leaderboard_cache_hits_total"),
        cache_misses_total: register_int_counter!(
            "leaderboard_cache_misses_total",
            "Leaderboard page cache misses"
        )
        .expect("register leaderboard_cache_misses_total"),
        page_query_seconds: register_histogram!(
            "leaderboard_page_query_seconds",
            "Time to answer a leaderboard page query",
            vec![0.0001, 0.0005, 0.001, 0.005, 0.01, 0.05]
        )
        .expect("register leaderboard_page_query_seconds"),
    })
}

pub fn dispatcher_metrics() -> &'static DispatcherMetrics {
    DISPATCHER.get_or_init(|| DispatcherMetrics {
        ticks_total: register_int_counter!(
            "dispatcher_ticks_total",
            "Total coordination ticks executed"
        )
        .expect("register dispatcher_ticks_total"),
        tick_duration_seconds: register_histogram!(
            "dispatcher_tick_duration_seconds",
            "Wall-clock duration of a single coordination tick",
            vec![0.0001, 0.0005, 0.001, 0.005, 0.01, 0.05, 0.1]
        )
        .expect("register dispatcher_tick_duration_seconds"),
    })
}

pub fn metrics_router(metrics_path: &'static str) -> Router {
    Router::new().route(metrics_path, get(metrics_handler))
}

pub async fn serve_metrics(listener: TcpListener, metrics_path: &'static str) -> Result<(), BoxError> {
    let router = metrics_router(metrics_path);
    axum::serve(listener, router)
        .await
        .map_err(|err| Box::new(err) as BoxError)
}

pub fn spawn_metrics_exporter(
    addr: SocketAddr,
    metrics_path: &'static str,
    service_name: &'static str,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        match TcpListener::bind(addr).await {
            Ok(listener) => {
                if let Err(err) = serve_metrics(listener, metrics_path).await {
                    error!(%err, service = service_name, %addr, path = metrics_path, "metrics exporter stopped unexpectedly");
                }
            }
            Err(err) => {
                error!(%err, service = service_name, %addr, path = metrics_path, "metrics exporter failed to bind");
            }
        }
    })
}

async fn metrics_handler() -> impl IntoResponse {
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();
    let encoder = TextEncoder::new();

    if let Err(err) = encoder.encode(&metric_families, &mut buffer) {
        error!(%err, "metrics: encode failed");
        return StatusCode::INTERNAL_SERVER_ERROR.into_response();
    }

    let body = match String::from_utf8(buffer) {
        Ok(text) => text,
        Err(err) => {
            error!(%err, "metrics: invalid utf-8");
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    };

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, encoder.format_type())
        .body(Body::from(body))
        .unwrap()
}
