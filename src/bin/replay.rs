//! Replay a cutting-plan CSV through one allocation batch.
//!
//! Loads an optional occupancy fixture (stock + staging slot labels)
//! and an optional oversize registry, then allocates every plan row in
//! order and prints the decisions the persistence layer would commit.

use clap::Parser;
use serde::Deserialize;

use rackfill::slot::slot_label;
use rackfill::{Command, CutPlanRow, Engine, OccupancySnapshot, OutputEvent, PartCode, ProjectCode};

#[derive(Parser, Debug)]
#[command(name = "replay", about = "Replay a cutting plan through the slot allocator")]
struct Args {
    /// Cutting-plan CSV (columns: OP, PART, PROJECT, VEHICLE, SENSOR)
    #[arg(long)]
    plan: String,

    /// Occupancy fixture CSV (column: SLOT, one row per resident part)
    #[arg(long)]
    occupancy: Option<String>,

    /// Oversize registry CSV (columns: PROJECT, PART)
    #[arg(long)]
    oversize: Option<String>,

    /// Only print the summary
    #[arg(long, default_value_t = false)]
    quiet: bool,
}

/// One resident part in the occupancy fixture
#[derive(Debug, Deserialize)]
struct OccupancyRow {
    #[serde(rename = "SLOT")]
    slot: String,
}

/// One oversize registration
#[derive(Debug, Deserialize)]
struct OversizeRow {
    #[serde(rename = "PROJECT")]
    project: String,
    #[serde(rename = "PART")]
    part: String,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let mut engine = Engine::new();

    // Occupancy fixture: union of stock + staging labels
    if let Some(path) = &args.occupancy {
        let mut snapshot = OccupancySnapshot::new();
        let mut reader = csv::Reader::from_path(path)?;
        for row in reader.deserialize::<OccupancyRow>() {
            // Blank or foreign labels count for nothing, like the store query
            snapshot.record_label(&row?.slot);
        }
        println!(
            "Loaded occupancy: {} parts across {} slots",
            snapshot.total(),
            snapshot.occupied_slots()
        );
        engine.load_occupancy(snapshot);
    }

    // Oversize registry
    if let Some(path) = &args.oversize {
        let mut reader = csv::Reader::from_path(path)?;
        for row in reader.deserialize::<OversizeRow>() {
            let row = row?;
            match (ProjectCode::new(&row.project), PartCode::new(&row.part)) {
                (Some(project), Some(part)) => engine.parts.flag_oversize(project, part),
                _ => eprintln!("skipping bad oversize row: {:?}", row),
            }
        }
        println!("Loaded {} oversize registrations", engine.parts.len());
    }

    // One batch for the whole plan
    engine.begin_batch();

    let mut assigned = 0u64;
    let mut skipped = 0u64;
    let mut dropped = 0u64;

    let mut reader = csv::Reader::from_path(&args.plan)?;
    for row in reader.deserialize::<CutPlanRow>() {
        let row = row?;
        let request = match row.to_request() {
            Some(r) => r,
            None => {
                dropped += 1;
                if !args.quiet {
                    println!("DROP   op={} (incomplete row)", row.op);
                }
                continue;
            }
        };

        for event in engine.process_command(Command::Place(request)) {
            match event {
                OutputEvent::Assigned(a) => {
                    assigned += 1;
                    if !args.quiet {
                        println!(
                            "ASSIGN op={} part={} sensor={} -> {} ({})",
                            row.op,
                            a.part,
                            row.effective_sensor(),
                            slot_label(a.slot),
                            a.category
                        );
                    }
                }
                OutputEvent::Skipped(s) => {
                    skipped += 1;
                    if !args.quiet {
                        println!("SKIP   op={} part={} (no capacity)", row.op, s.part);
                    }
                }
                OutputEvent::BatchStarted => {}
            }
        }
    }

    println!("\n=== Replay Summary ===");
    println!("Assigned: {}", assigned);
    println!("Skipped:  {}", skipped);
    println!("Dropped:  {}", dropped);
    println!("Reserved in overlay: {}", engine.reserved());
    println!("State hash: {:#018x}", engine.state_hash());

    Ok(())
}
