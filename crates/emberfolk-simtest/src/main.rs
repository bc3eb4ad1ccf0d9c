//! Emberfolk Headless Scenario Harness
//!
//! Exercises the task engine end-to-end without rendering or persistence.
//! Runs entirely in-process.
//!
//! Usage:
//!   cargo run -p emberfolk-simtest
//!   cargo run -p emberfolk-simtest -- --verbose

use emberfolk_core::components::{
    Age, Agent, AgentKind, Bush, Inventory, Needs, Position, Storage, Vec2,
};
use emberfolk_core::engine::Simulation;
use emberfolk_core::spawn::spawn_camp;
use emberfolk_core::strategy::Objective;
use emberfolk_core::tasks::{entity_bits, TaskId, TaskKind, TaskStatus};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Deserialize;

// ── Scenario manifest ───────────────────────────────────────────────────
const SCENARIO_JSON: &str = r#"{
    "seed": 42,
    "dt": 0.1,
    "camps": [
        { "tribe": 1, "adults": 8, "x": 0.0, "y": 0.0 },
        { "tribe": 2, "adults": 5, "x": 60.0, "y": 0.0 }
    ],
    "day_ticks": 240
}"#;

#[derive(Debug, Deserialize)]
struct ScenarioConfig {
    seed: u64,
    dt: f64,
    camps: Vec<CampSpec>,
    day_ticks: u32,
}

#[derive(Debug, Deserialize)]
struct CampSpec {
    tribe: u32,
    adults: usize,
    x: f32,
    y: f32,
}

// ── Test harness ────────────────────────────────────────────────────────

struct TestResult {
    name: String,
    passed: bool,
    detail: String,
}

impl TestResult {
    fn new(name: &str, passed: bool, detail: impl Into<String>) -> Self {
        Self {
            name: name.to_string(),
            passed,
            detail: detail.into(),
        }
    }
}

fn main() {
    let verbose = std::env::args().any(|a| a == "--verbose");
    println!("=== Emberfolk Scenario Harness ===\n");

    let config: ScenarioConfig =
        serde_json::from_str(SCENARIO_JSON).expect("scenario manifest must parse");

    let mut results = Vec::new();

    results.push(check_gather_claim());
    results.push(check_contention());
    results.push(check_wait_blocking(config.dt));
    results.push(check_command_override());
    results.push(check_claim_survives_reproduction());
    results.extend(run_full_day(&config, verbose));

    // ── Summary ──
    println!();
    let passed = results.iter().filter(|r| r.passed).count();
    let failed = results.iter().filter(|r| !r.passed).count();
    let total = results.len();

    for r in &results {
        let icon = if r.passed { "✓" } else { "✗" };
        if !r.passed || verbose {
            println!("  {} {}: {}", icon, r.name, r.detail);
        }
    }

    println!(
        "\n=== RESULT: {}/{} passed, {} failed ===",
        passed, total, failed
    );

    if failed > 0 {
        std::process::exit(1);
    }
}

fn spawn_worker(sim: &mut Simulation, x: f32) -> hecs::Entity {
    sim.world.spawn((
        Agent::new(AgentKind::Human),
        Age::new(25.0),
        Position::new(x, 0.0),
        Needs::default(),
        Inventory::new(4),
    ))
}

// ── 1. Production + bidding hands a worker the bush's task ──────────────
fn check_gather_claim() -> TestResult {
    let mut sim = Simulation::new();
    let agent = spawn_worker(&mut sim, 0.0);
    let bush = sim.world.spawn((Bush::new(3, 5), Position::new(2.0, 0.0)));

    sim.tick(0.1);

    let expected = TaskId::derived(entity_bits(bush), TaskKind::Gather);
    let current = sim.world.get::<&Agent>(agent).unwrap().current_task.clone();
    let passed = current.as_ref() == Some(&expected);
    TestResult::new(
        "gather-claim",
        passed,
        format!("current task = {current:?}"),
    )
}

// ── 2. One slot, two bidders: a single claimant ─────────────────────────
fn check_contention() -> TestResult {
    let mut sim = Simulation::new();
    let first = spawn_worker(&mut sim, 0.0);
    let second = spawn_worker(&mut sim, 0.1);
    let bush = sim.world.spawn((Bush::new(3, 5), Position::new(2.0, 0.0)));

    sim.tick(0.1);

    let gather = TaskId::derived(entity_bits(bush), TaskKind::Gather);
    let holders = [first, second]
        .iter()
        .filter(|&&a| {
            sim.world.get::<&Agent>(a).unwrap().current_task.as_ref() == Some(&gather)
        })
        .count();
    TestResult::new(
        "claim-exclusivity",
        holders == 1,
        format!("{holders} holder(s) of one gather slot"),
    )
}

// ── 3. Wait blocks, then completes near its deadline ────────────────────
fn check_wait_blocking(dt: f64) -> TestResult {
    let mut sim = Simulation::new();
    let agent = spawn_worker(&mut sim, 0.0);
    let id = sim.block(agent, 1.0);

    let mut completed_at = None;
    for step in 1..=20 {
        sim.tick(dt);
        if sim.board.get(&id).is_none() {
            completed_at = Some(step);
            break;
        }
    }

    let history_ok = sim
        .world
        .get::<&Agent>(agent)
        .unwrap()
        .history
        .iter()
        .any(|e| e.kind == TaskKind::Wait && e.result == TaskStatus::Success);
    let passed = matches!(completed_at, Some(step) if step >= 5) && history_ok;
    TestResult::new(
        "wait-blocking",
        passed,
        format!("wait resolved after {completed_at:?} ticks"),
    )
}

// ── 4. Command override preempts in the same tick ───────────────────────
fn check_command_override() -> TestResult {
    let mut sim = Simulation::new();
    let agent = spawn_worker(&mut sim, 0.0);
    sim.world.spawn((Bush::new(5, 5), Position::new(3.0, 0.0)));

    sim.tick(0.1);
    let before = sim.world.get::<&Agent>(agent).unwrap().current_task.clone();

    let command = sim.issue_command(agent, Vec2::new(20.0, 0.0), 50.0);
    sim.tick(0.1);

    let after = sim.world.get::<&Agent>(agent).unwrap().current_task.clone();
    let last = sim.world.get::<&Agent>(agent).unwrap().last_result;
    let passed = after.as_ref() == Some(&command) && last == Some(TaskStatus::Failure);
    TestResult::new(
        "command-override",
        passed,
        format!("{before:?} -> {after:?}"),
    )
}

// ── 5. Claims survive routine re-production ─────────────────────────────
fn check_claim_survives_reproduction() -> TestResult {
    let mut sim = Simulation::new();
    let agent = spawn_worker(&mut sim, 0.0);
    let bush = sim.world.spawn((Bush::new(5, 5), Position::new(15.0, 0.0)));

    sim.tick(0.1);
    let gather = TaskId::derived(entity_bits(bush), TaskKind::Gather);
    let mut stable = true;
    for _ in 0..5 {
        sim.tick(0.1);
        let claim = sim.board.get(&gather).and_then(|t| t.claimed_by);
        if claim != Some(entity_bits(agent)) {
            stable = false;
            break;
        }
    }
    TestResult::new(
        "claim-preservation",
        stable,
        "claim held across 5 production passes",
    )
}

// ── 6. A full simulated day across two camps ────────────────────────────
fn run_full_day(config: &ScenarioConfig, verbose: bool) -> Vec<TestResult> {
    let mut sim = Simulation::new();
    let mut rng = StdRng::seed_from_u64(config.seed);

    for camp in &config.camps {
        spawn_camp(
            &mut sim.world,
            &mut rng,
            Vec2::new(camp.x, camp.y),
            camp.tribe,
            camp.adults,
        );
    }
    // The first tribe's leader wants the stores filled
    sim.plan.set_objective(config.camps[0].tribe, Objective::Hoard);

    for _ in 0..config.day_ticks {
        sim.tick(config.dt);
    }

    let agents = sim.agent_count();
    let mut with_history = 0;
    for (_, agent) in sim.world.query::<&Agent>().iter() {
        if !agent.history.is_empty() {
            with_history += 1;
        }
    }
    let stored: u32 = sim
        .world
        .query::<&Storage>()
        .iter()
        .map(|(_, s)| s.stored())
        .sum();

    if verbose {
        println!(
            "  day summary: {} agents, {} live tasks, {} stored resources",
            agents,
            sim.task_count(),
            stored
        );
    }

    vec![
        TestResult::new(
            "day-activity",
            with_history == agents,
            format!("{with_history}/{agents} agents completed at least one task"),
        ),
        TestResult::new(
            "day-stored",
            stored > 0,
            format!("{stored} resources in the stores after a day"),
        ),
        TestResult::new(
            "day-board-bounded",
            sim.task_count() < 200,
            format!("{} live tasks on the board", sim.task_count()),
        ),
    ]
}
