use std::collections::HashSet;

use petgraph::graph::{DiGraph, NodeIndex};
use rand::Rng;

use common::ids::PlayerId;

use crate::match_slot::{BracketMatch, BracketSide, FeedKind, Slot, SlotState};
use crate::seeding::{next_power_of_two, seed_order};

pub type BracketGraph = DiGraph<BracketMatch, FeedKind>;

/// A generated bracket: the match DAG plus the terminal nodes that carry the
/// tournament's final standings once fully resolved.
pub struct Bracket {
    pub graph: BracketGraph,
    pub champion_node: NodeIndex,
    pub runner_up_node: Option<NodeIndex>,
}

fn seeded_leaf_slots(participants: &[PlayerId], size: usize) -> Vec<Slot> {
    seed_order(size)
        .into_iter()
        .map(|seed| {
            if seed <= participants.len() {
                Slot::Participant(participants[seed - 1])
            } else {
                Slot::Bye
            }
        })
        .collect()
}

fn resolve_bye(m: &mut BracketMatch) {
    match (m.slot_a, m.slot_b) {
        (Slot::Participant(p), Slot::Bye) | (Slot::Bye, Slot::Participant(p)) => {
            m.state = SlotState::Completed;
            m.winner = Some(p);
        }
        (Slot::Bye, Slot::Bye) => {
            m.state = SlotState::Completed;
            m.winner = None;
        }
        _ => {}
    }
}

fn outcome_of(m: &BracketMatch, kind: FeedKind) -> Option<Option<PlayerId>> {
    if m.state != SlotState::Completed {
        return None;
    }
    Some(match kind {
        FeedKind::Winner => m.winner,
        FeedKind::Loser => m.loser,
    })
}

/// Pushes resolved winners/losers along the DAG's edges into any downstream
/// match still waiting on them, resolving bye chains as it goes. Runs to a
/// fixed point since a bye can cascade through several rounds at once.
pub fn propagate(graph: &mut BracketGraph) {
    let mut changed = true;
    while changed {
        changed = false;
        let indices: Vec<NodeIndex> = graph.node_indices().collect();
        for node in indices {
            let source_a = graph[node].source_a;
            let source_b = graph[node].source_b;
            if matches!(graph[node].slot_a, Slot::Pending) {
                if let Some((src, kind)) = source_a {
                    if let Some(value) = outcome_of(&graph[src], kind) {
                        graph[node].slot_a = value.map_or(Slot::Bye, Slot::Participant);
                        changed = true;
                    }
                }
            }
            if matches!(graph[node].slot_b, Slot::Pending) {
                if let Some((src, kind)) = source_b {
                    if let Some(value) = outcome_of(&graph[src], kind) {
                        graph[node].slot_b = value.map_or(Slot::Bye, Slot::Participant);
                        changed = true;
                    }
                }
            }
            graph[node].refresh_state();
            resolve_bye(&mut graph[node]);
        }
    }
}

/// Marks `node` as finished with the given winner/loser and propagates the
/// result to whatever matches are waiting on it.
pub fn record_result(graph: &mut BracketGraph, node: NodeIndex, winner: PlayerId, loser: PlayerId) {
    let m = &mut graph[node];
    m.winner = Some(winner);
    m.loser = Some(loser);
    m.state = SlotState::Completed;
    propagate(graph);
}

pub fn build_single_elimination(participants: &[PlayerId]) -> Bracket {
    let size = next_power_of_two(participants.len().max(2));
    let leaves = seeded_leaf_slots(participants, size);
    let mut graph = BracketGraph::new();

    let mut prev: Vec<NodeIndex> = leaves
        .chunks(2)
        .enumerate()
        .map(|(i, pair)| {
            let mut m = BracketMatch::new(1, BracketSide::Winners, i, pair[0], pair[1]);
            resolve_bye(&mut m);
            graph.add_node(m)
        })
        .collect();

    let mut round = 2u32;
    while prev.len() > 1 {
        let mut this_round = Vec::with_capacity(prev.len() / 2);
        for (i, pair) in prev.chunks(2).enumerate() {
            let mut m = BracketMatch::new(round, BracketSide::Winners, i, Slot::Pending, Slot::Pending);
            m.source_a = Some((pair[0], FeedKind::Winner));
            m.source_b = Some((pair[1], FeedKind::Winner));
            let node = graph.add_node(m);
            graph.add_edge(pair[0], node, FeedKind::Winner);
            graph.add_edge(pair[1], node, FeedKind::Winner);
            this_round.push(node);
        }
        prev = this_round;
        round += 1;
    }

    let champion_node = prev[0];
    propagate(&mut graph);
    Bracket {
        graph,
        champion_node,
        runner_up_node: None,
    }
}

fn pair_losers_round(
    graph: &mut BracketGraph,
    drop: &[NodeIndex],
    round: u32,
    position: &mut usize,
) -> Vec<NodeIndex> {
    let mut out = Vec::with_capacity((drop.len() + 1) / 2);
    let mut i = 0;
    while i < drop.len() {
        let slot_b = if i + 1 < drop.len() {
            Slot::Pending
        } else {
            Slot::Bye
        };
        let mut m = BracketMatch::new(round, BracketSide::Losers, *position, Slot::Pending, slot_b);
        m.source_a = Some((drop[i], FeedKind::Loser));
        let node_pending_b = i + 1 < drop.len();
        if node_pending_b {
            m.source_b = Some((drop[i + 1], FeedKind::Loser));
        }
        let node = graph.add_node(m);
        graph.add_edge(drop[i], node, FeedKind::Loser);
        if node_pending_b {
            graph.add_edge(drop[i + 1], node, FeedKind::Loser);
        }
        out.push(node);
        *position += 1;
        i += 2;
    }
    out
}

fn merge_losers_round(
    graph: &mut BracketGraph,
    survivors: &[NodeIndex],
    drop: &[NodeIndex],
    round: u32,
    position: &mut usize,
) -> Vec<NodeIndex> {
    let len = survivors.len().max(drop.len());
    let mut out = Vec::with_capacity(len);
    for idx in 0..len {
        let src_a = survivors.get(idx).copied();
        let src_b = drop.get(idx).copied();
        let slot_a = if src_a.is_some() { Slot::Pending } else { Slot::Bye };
        let slot_b = if src_b.is_some() { Slot::Pending } else { Slot::Bye };
        let mut m = BracketMatch::new(round, BracketSide::Losers, *position, slot_a, slot_b);
        if let Some(s) = src_a {
            m.source_a = Some((s, FeedKind::Winner));
        }
        if let Some(s) = src_b {
            m.source_b = Some((s, FeedKind::Loser));
        }
        let node = graph.add_node(m);
        if let Some(s) = src_a {
            graph.add_edge(s, node, FeedKind::Winner);
        }
        if let Some(s) = src_b {
            graph.add_edge(s, node, FeedKind::Loser);
        }
        out.push(node);
        *position += 1;
    }
    out
}

/// Double elimination: winners bracket is a plain single-elimination tree;
/// losers dropping out of each winners round merge sequentially into the
/// losers bracket rather than being re-seeded, which keeps the structure a
/// simple DAG walk instead of a second seeding pass.
pub fn build_double_elimination(participants: &[PlayerId]) -> Bracket {
    let size = next_power_of_two(participants.len().max(2));
    let leaves = seeded_leaf_slots(participants, size);
    let mut graph = BracketGraph::new();

    let mut w_rounds: Vec<Vec<NodeIndex>> = Vec::new();
    let mut prev: Vec<NodeIndex> = leaves
        .chunks(2)
        .enumerate()
        .map(|(i, pair)| {
            let mut m = BracketMatch::new(1, BracketSide::Winners, i, pair[0], pair[1]);
            resolve_bye(&mut m);
            graph.add_node(m)
        })
        .collect();
    w_rounds.push(prev.clone());

    let mut round = 2u32;
    while prev.len() > 1 {
        let mut this_round = Vec::with_capacity(prev.len() / 2);
        for (i, pair) in prev.chunks(2).enumerate() {
            let mut m = BracketMatch::new(round, BracketSide::Winners, i, Slot::Pending, Slot::Pending);
            m.source_a = Some((pair[0], FeedKind::Winner));
            m.source_b = Some((pair[1], FeedKind::Winner));
            let node = graph.add_node(m);
            graph.add_edge(pair[0], node, FeedKind::Winner);
            graph.add_edge(pair[1], node, FeedKind::Winner);
            this_round.push(node);
        }
        w_rounds.push(this_round.clone());
        prev = this_round;
        round += 1;
    }
    let winners_champion_node = prev[0];

    let mut lb_round = round;
    let mut lb_position = 0usize;
    let mut survivors = pair_losers_round(&mut graph, &w_rounds[0], lb_round, &mut lb_position);
    lb_round += 1;

    for w_round in &w_rounds[1..] {
        survivors = merge_losers_round(&mut graph, &survivors, w_round, lb_round, &mut lb_position);
        lb_round += 1;
    }
    let losers_champion_node = survivors[0];

    let mut gf = BracketMatch::new(lb_round, BracketSide::GrandFinal, 0, Slot::Pending, Slot::Pending);
    gf.source_a = Some((winners_champion_node, FeedKind::Winner));
    gf.source_b = Some((losers_champion_node, FeedKind::Winner));
    let gf_node = graph.add_node(gf);
    graph.add_edge(winners_champion_node, gf_node, FeedKind::Winner);
    graph.add_edge(losers_champion_node, gf_node, FeedKind::Winner);

    propagate(&mut graph);
    Bracket {
        graph,
        champion_node: gf_node,
        runner_up_node: Some(losers_champion_node),
    }
}

fn pair_key(a: PlayerId, b: PlayerId) -> (PlayerId, PlayerId) {
    if a.0 < b.0 {
        (a, b)
    } else {
        (b, a)
    }
}

/// Pairs players by current standing for the next Swiss round, preferring
/// opponents not yet played and scanning outward from each player's score
/// neighborhood. Falls back to a rematch only when no fresh opponent remains.
pub fn swiss_pairing(
    standings: &[(PlayerId, f64)],
    played: &HashSet<(PlayerId, PlayerId)>,
    rng: &mut impl Rng,
) -> Vec<(PlayerId, PlayerId)> {
    let mut pool = standings.to_vec();
    pool.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));

    let mut used: HashSet<PlayerId> = HashSet::new();
    let mut pairs = Vec::with_capacity(pool.len() / 2);

    for i in 0..pool.len() {
        let (p, _) = pool[i];
        if used.contains(&p) {
            continue;
        }
        let fresh: Vec<usize> = (i + 1..pool.len())
            .filter(|&j| !used.contains(&pool[j].0) && !played.contains(&pair_key(p, pool[j].0)))
            .collect();

        let chosen_idx = if !fresh.is_empty() {
            let window = fresh.len().min(3);
            fresh[rng.gen_range(0..window)]
        } else if let Some(j) = (i + 1..pool.len()).find(|&j| !used.contains(&pool[j].0)) {
            tracing::warn!(player = p.0, "swiss pairing forced a rematch");
            j
        } else {
            continue;
        };

        let q = pool[chosen_idx].0;
        used.insert(p);
        used.insert(q);
        pairs.push((p, q));
    }
    pairs
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn players(n: usize) -> Vec<PlayerId> {
        (1..=n as u64).map(PlayerId).collect()
    }

    #[test]
    fn single_elimination_resolves_champion_for_power_of_two() {
        let p = players(8);
        let mut bracket = build_single_elimination(&p);
        // manually play every match in round order until the champion node resolves
        let mut rounds_played = 0;
        while bracket.graph[bracket.champion_node].winner.is_none() && rounds_played < 10 {
            let ready: Vec<NodeIndex> = bracket
                .graph
                .node_indices()
                .filter(|&n| bracket.graph[n].is_ready())
                .collect();
            for node in ready {
                let (a, b) = bracket.graph[node].participants();
                if let (Some(a), Some(b)) = (a, b) {
                    let (winner, loser) = if a.0 < b.0 { (a, b) } else { (b, a) };
                    record_result(&mut bracket.graph, node, winner, loser);
                }
            }
            rounds_played += 1;
        }
        assert!(bracket.graph[bracket.champion_node].winner.is_some());
    }

    #[test]
    fn single_elimination_handles_byes_for_non_power_of_two() {
        let p = players(5);
        let bracket = build_single_elimination(&p);
        let byes = bracket
            .graph
            .node_indices()
            .filter(|&n| bracket.graph[n].winner.is_some() && bracket.graph[n].round == 1)
            .count();
        assert_eq!(byes, 3);
    }

    #[test]
    fn double_elimination_builds_grand_final_fed_by_both_brackets() {
        let p = players(4);
        let bracket = build_double_elimination(&p);
        let gf = &bracket.graph[bracket.champion_node];
        assert_eq!(gf.side, BracketSide::GrandFinal);
        assert!(gf.source_a.is_some() && gf.source_b.is_some());
    }

    #[test]
    fn swiss_pairing_avoids_rematches_when_possible() {
        let standings = vec![
            (PlayerId(1), 2.0),
            (PlayerId(2), 2.0),
            (PlayerId(3), 1.0),
            (PlayerId(4), 1.0),
        ];
        let mut played = HashSet::new();
        played.insert(pair_key(PlayerId(1), PlayerId(2)));
        let mut rng = rand_chacha::ChaCha8Rng::seed_from_u64(42);
        let pairs = swiss_pairing(&standings, &played, &mut rng);
        assert!(!pairs.contains(&(PlayerId(1), PlayerId(2))));
        assert!(!pairs.contains(&(PlayerId(2), PlayerId(1))));
    }
}
