/// Scripted run: walks "The Silent Thread" from the intro to the true ending.
///
/// Collects the three pieces of evidence along the way: the Metal Shard in
/// the ward, the Personnel File from the office keypad, and the Burnt Canvas
/// from the portrait. The seal in the tower is aligned ring by ring.
///
/// Dice checks are forced to a natural 20 so the run is the same every time.
///
/// Run with: cargo run --example scripted_run
use silent_thread::core::dice::D20;
use silent_thread::core::engine::{GameMode, NarrativeEngine};
use silent_thread::core::puzzle::PuzzleInput;
use silent_thread::core::signal::Signal;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "silent_thread=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let mut engine = NarrativeEngine::builder()
        .content_dir("content/silent_thread")
        .seed(89)
        .build()
        .expect("Failed to build engine");

    let natural_20 = D20::new(20).expect("20 is a d20 face");

    // --- Chapter 1: the ward ---
    engine.start_game();
    engine.complete_cinematic();
    report(&mut engine, "start");

    choose(&mut engine, 1); // Look around the room first.
    engine.interact_hotspot("bed_pillow");
    engine.exit_investigation();
    report(&mut engine, "ward searched");

    choose(&mut engine, 0); // Enter the hallway.
    choose(&mut engine, 0); // Sneak past it.
    engine.resolve_dice_outcome(natural_20);
    report(&mut engine, "sneak check");

    // --- Chapter 2: the factory office ---
    choose(&mut engine, 0); // Move to the Factory.
    choose(&mut engine, 1); // Investigate the Office.
    engine.interact_hotspot("cabinet_locked");
    for digit in [0, 8, 9] {
        engine.puzzle_input(PuzzleInput::Digit(digit));
    }
    engine.puzzle_input(PuzzleInput::Submit);
    settle(&mut engine);
    engine.exit_investigation();
    report(&mut engine, "office keypad");

    choose(&mut engine, 0); // Head to the gears.
    engine.resolve_dice_outcome(natural_20);

    // --- Chapter 3: the vents ---
    choose(&mut engine, 0); // Crawl forward.
    choose(&mut engine, 1); // Go Right (Seamstress).
    choose(&mut engine, 0); // Take the drawing.
    report(&mut engine, "vents");

    // --- Chapter 4: the portrait ---
    choose(&mut engine, 0); // Inspect the central portrait.
    choose(&mut engine, 0); // Touch the canvas.
    engine.resolve_dice_outcome(natural_20);
    report(&mut engine, "portrait");

    // --- Chapter 5: the tower seal ---
    choose(&mut engine, 0); // Enter the hidden door.
    choose(&mut engine, 1); // Inspect the Sealed Door.
    choose(&mut engine, 0); // Solve the Seal.
    engine.interact_hotspot("rune_seal");
    for (ring, steps) in [(0, 5), (1, 3), (2, 6)] {
        for _ in 0..steps {
            engine.puzzle_input(PuzzleInput::Rotate(ring));
        }
    }
    settle(&mut engine);
    report(&mut engine, "tower seal");

    // --- Chapter 6: the loom ---
    choose(&mut engine, 0); // Proceed to the summit.
    choose(&mut engine, 0); // Confront her.
    assert!(engine.can_unlock_true_ending());
    choose(&mut engine, 2); // The truth matters.
    choose(&mut engine, 0); // Cut the final thread.
    report(&mut engine, "final choice");

    engine.complete_cinematic();
    assert_eq!(engine.mode(), GameMode::Victory);

    let session = engine.session();
    println!("\n=== {} ===", engine.mode().tag());
    if let Some(summary) = engine.view().summary {
        println!("{}", summary);
    }
    println!("Sanity: {}/{}", session.sanity(), session.sanity_max());
    println!("Inventory:");
    for item in session.inventory().items() {
        println!("  {}", item);
    }
}

fn choose(engine: &mut NarrativeEngine, index: usize) {
    let node = engine.current_node().id.clone();
    assert!(
        engine.select_option(index),
        "option {} of \"{}\" was refused",
        index,
        node
    );
}

/// Run the puzzle success delay down.
fn settle(engine: &mut NarrativeEngine) {
    while engine.mode() == GameMode::Puzzle {
        engine.advance(Duration::from_millis(100));
    }
}

fn report(engine: &mut NarrativeEngine, label: &str) {
    println!("--- {} ---", label);
    println!("[{}] {}", engine.mode().tag(), engine.current_node().id);
    for signal in engine.drain_signals() {
        match signal {
            Signal::ItemAcquired(item) => println!("  + {}", item),
            Signal::Tension { cost, sanity } => println!("  sanity -{} => {}", cost, sanity),
            Signal::DiceResult { roll, target, .. } => println!("  rolled {} vs {}", roll, target),
            Signal::Cinematic { kind, video, .. } => println!("  cinematic {:?}: {}", kind, video),
            Signal::PuzzleSolved => println!("  puzzle solved"),
            _ => {}
        }
    }
    println!();
}
