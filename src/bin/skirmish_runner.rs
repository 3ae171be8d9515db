//! Headless Skirmish Runner
//!
//! Runs a seeded AI-vs-AI battle (investigators against an enemy squad) and
//! prints a JSON summary. Useful for balance sweeps and regression checks.

use clap::Parser;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;

use eldritch_tactics::battle::{
    execute_enemy_turn, format_attack_result, generate_random, terrain_gen, Grid, TerrainPattern,
    TurnQueue,
};
use eldritch_tactics::core::types::UnitId;
use eldritch_tactics::entities::{
    investigator_squad, random_enemy_squad, CombatDeck, Team, Unit, UnitRoster,
};

/// Headless skirmish runner - seeded AI vs AI battles
#[derive(Parser, Debug)]
#[command(name = "skirmish_runner")]
#[command(about = "Run AI vs AI skirmishes and output JSON results")]
struct Args {
    /// Random seed for deterministic runs
    #[arg(long)]
    seed: Option<u64>,

    /// Grid size (square)
    #[arg(long, default_value_t = 10)]
    grid_size: i32,

    /// Terrain pattern (symmetric, scattered, urban_ruins, ritual_site,
    /// open_field, chokepoint); random if omitted
    #[arg(long)]
    pattern: Option<String>,

    /// Maximum rounds before the battle is scored a timeout
    #[arg(long, default_value_t = 50)]
    max_rounds: u32,

    /// Output format: json or text
    #[arg(long, default_value = "json")]
    format: String,

    /// Print each unit's turn to stderr
    #[arg(long, short = 'v')]
    verbose: bool,
}

/// JSON output structure
#[derive(Serialize)]
struct SkirmishResult {
    outcome: String,
    rounds: u32,
    seed: u64,
    pattern: String,
    investigators_standing: usize,
    enemies_standing: usize,
    investigator_health_remaining: i32,
    enemy_health_remaining: i32,
    monster_deck_draws: u32,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let seed = args.seed.unwrap_or_else(rand::random);
    let mut rng = StdRng::seed_from_u64(seed);

    let mut grid = Grid::new(args.grid_size);

    // Terrain
    let (pattern_name, placements) = match &args.pattern {
        Some(name) => match name.parse::<TerrainPattern>() {
            Ok(pattern) => (
                pattern.as_str().to_string(),
                terrain_gen::generate(pattern, args.grid_size, &mut rng),
            ),
            Err(e) => {
                eprintln!("{e}");
                std::process::exit(2);
            }
        },
        None => ("random".to_string(), generate_random(args.grid_size, &mut rng)),
    };
    if let Err(e) = grid.apply_terrain(&placements) {
        eprintln!("terrain generation produced invalid placement: {e}");
        std::process::exit(1);
    }

    // Squads: investigators on the left edge, enemies on the right
    let mut units = UnitRoster::new();
    let investigators = investigator_squad(&mut rng);
    let enemies = random_enemy_squad(&mut rng);

    let player_ids = deploy(&mut grid, &mut units, investigators, 1, args.grid_size);
    let enemy_ids = deploy(&mut grid, &mut units, enemies, args.grid_size - 2, args.grid_size);

    // Alternate initiative between the sides
    let mut order = Vec::new();
    for i in 0..player_ids.len().max(enemy_ids.len()) {
        if let Some(&id) = player_ids.get(i) {
            order.push(id);
        }
        if let Some(&id) = enemy_ids.get(i) {
            order.push(id);
        }
    }
    let mut queue = TurnQueue::new(order);

    let mut monster_deck = CombatDeck::standard(&mut rng);

    // Battle loop: every unit is AI-driven
    while !TurnQueue::battle_over(&units) && queue.round < args.max_rounds {
        let Some(actor_id) = queue.next_turn(&mut units) else {
            break;
        };

        let is_enemy = units.get(actor_id).map(|u| u.team == Team::Enemy).unwrap_or(false);
        let deck = is_enemy.then_some(&mut monster_deck);

        match execute_enemy_turn(actor_id, &mut units, &mut grid, deck, &mut rng) {
            Ok(report) => {
                if args.verbose {
                    if let (Some(result), Some(target_id)) = (&report.attack, report.target) {
                        if let (Some(attacker), Some(target)) =
                            (units.get(actor_id), units.get(target_id))
                        {
                            eprintln!("{}", format_attack_result(attacker, target, result));
                        }
                    }
                }
            }
            Err(e) => {
                eprintln!("turn failed: {e}");
                std::process::exit(1);
            }
        }
    }

    let investigators_standing = units.active_on_team(Team::Player).count();
    let enemies_standing = units.active_on_team(Team::Enemy).count();
    let outcome = if enemies_standing == 0 && investigators_standing > 0 {
        "investigators_win"
    } else if investigators_standing == 0 && enemies_standing > 0 {
        "enemies_win"
    } else if investigators_standing == 0 && enemies_standing == 0 {
        "mutual_destruction"
    } else {
        "timeout"
    };

    let result = SkirmishResult {
        outcome: outcome.to_string(),
        rounds: queue.round,
        seed,
        pattern: pattern_name,
        investigators_standing,
        enemies_standing,
        investigator_health_remaining: team_health(&units, Team::Player),
        enemy_health_remaining: team_health(&units, Team::Enemy),
        monster_deck_draws: monster_deck.statistics().total_draws,
    };

    match args.format.as_str() {
        "json" => {
            println!("{}", serde_json::to_string_pretty(&result).unwrap());
        }
        "text" => {
            println!("Skirmish Result");
            println!("===============");
            println!("Outcome: {}", result.outcome);
            println!("Rounds: {}", result.rounds);
            println!("Pattern: {}", result.pattern);
            println!(
                "Investigators standing: {} ({} HP)",
                result.investigators_standing, result.investigator_health_remaining
            );
            println!(
                "Enemies standing: {} ({} HP)",
                result.enemies_standing, result.enemy_health_remaining
            );
            println!("Monster deck draws: {}", result.monster_deck_draws);
            println!("Seed: {}", result.seed);
        }
        _ => {
            eprintln!("Unknown format '{}', defaulting to json", args.format);
            println!("{}", serde_json::to_string_pretty(&result).unwrap());
        }
    }
}

/// Place a squad in column `x`, spread evenly down the column
fn deploy(
    grid: &mut Grid,
    units: &mut UnitRoster,
    squad: Vec<Unit>,
    x: i32,
    grid_size: i32,
) -> Vec<UnitId> {
    let step = grid_size / (squad.len() as i32 + 1);
    let mut ids = Vec::new();
    for (i, mut unit) in squad.into_iter().enumerate() {
        let y = step * (i as i32 + 1);
        if !grid.place_unit(&mut unit, x, y) {
            eprintln!("could not deploy {} at ({x}, {y})", unit.name);
            std::process::exit(1);
        }
        ids.push(units.add(unit));
    }
    ids
}

fn team_health(units: &UnitRoster, team: Team) -> i32 {
    units.team(team).map(|u| u.current_health).sum()
}
