/// Play: text-mode host for walking a story without a renderer.
///
/// Usage: play [--content <dir>] [--seed <n>]
///
/// Commands:
///   look                     - show the current node, scene, or puzzle
///   continue                 - finish the playing cinematic
///   choose <n>               - pick option n of the current node
///   roll                     - roll the pending dice challenge
///   hotspot <id>             - click a hotspot by id
///   click <x> <y>            - click at scene coordinates (0-100)
///   digit <d> | delete | submit
///   toggle <row> <col>       - press a grid cell
///   rotate <ring>            - turn a ring one step
///   wait <ms>                - let timers run
///   exit                     - leave the open puzzle or scene
///   inventory                - list held items and sanity
///   restart                  - start over from the intro
///   help                     - list commands
///   quit                     - exit
use silent_thread::core::engine::{GameMode, NarrativeEngine};
use silent_thread::core::investigation::HotspotOutcome;
use silent_thread::core::puzzle::{PuzzleInput, PuzzleState};
use silent_thread::core::signal::{CinematicKind, Signal};
use std::io::{self, BufRead, Write};
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const DEFAULT_CONTENT: &str = "content/silent_thread";
const FRAME: Duration = Duration::from_millis(50);

fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "silent_thread=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args: Vec<String> = std::env::args().collect();

    let mut content_dir = DEFAULT_CONTENT.to_string();
    let mut seed = None;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--help" | "-h" => {
                print_usage();
                return;
            }
            "--content" if i + 1 < args.len() => {
                i += 1;
                content_dir = args[i].clone();
            }
            "--seed" if i + 1 < args.len() => {
                i += 1;
                seed = args[i].parse().ok();
            }
            _ => {
                eprintln!("Unknown argument: {}", args[i]);
                print_usage();
                std::process::exit(1);
            }
        }
        i += 1;
    }

    let mut builder = NarrativeEngine::builder().content_dir(&content_dir);
    if let Some(seed) = seed {
        builder = builder.seed(seed);
    }
    let mut engine = match builder.build() {
        Ok(engine) => engine,
        Err(e) => {
            eprintln!("ERROR: {}", e);
            std::process::exit(1);
        }
    };

    println!("{}", engine.content().manifest().title);
    if let Some(seed) = seed {
        println!("Seed: {}", seed);
    }
    println!("Type 'help' for commands.\n");

    engine.start_game();
    print_signals(&mut engine);

    let stdin = io::stdin();
    let mut stdout = io::stdout();

    loop {
        print!("{}> ", prompt(engine.mode()));
        stdout.flush().ok();

        let mut line = String::new();
        if stdin.lock().read_line(&mut line).is_err() || line.is_empty() {
            break;
        }
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let parts: Vec<&str> = line.split_whitespace().collect();
        let cmd = parts[0].to_lowercase();

        match cmd.as_str() {
            "quit" | "q" => {
                println!("Goodbye.");
                break;
            }
            "help" | "h" | "?" => print_help(),
            "look" | "l" => look(&engine),
            "continue" | "c" => engine.complete_cinematic(),
            "choose" | "option" => match parts.get(1).and_then(|s| s.parse().ok()) {
                Some(index) => {
                    if !engine.select_option(index) {
                        println!("(nothing happens)");
                    }
                }
                None => println!("Usage: choose <n>"),
            },
            "roll" => {
                if engine.request_roll() {
                    run_until(&mut engine, |e| e.mode() != GameMode::DiceRolling);
                } else {
                    println!("(no roll pending)");
                }
            }
            "hotspot" => match parts.get(1) {
                Some(id) => {
                    let outcome = engine.interact_hotspot(id);
                    describe_outcome(&outcome);
                }
                None => println!("Usage: hotspot <id>"),
            },
            "click" => {
                let coords: Option<(f32, f32)> = parts
                    .get(1)
                    .zip(parts.get(2))
                    .and_then(|(x, y)| Some((x.parse().ok()?, y.parse().ok()?)));
                match coords {
                    Some((x, y)) => {
                        let outcome = engine.interact_at(x, y);
                        describe_outcome(&outcome);
                    }
                    None => println!("Usage: click <x> <y>"),
                }
            }
            "digit" | "d" => match parts.get(1).and_then(|s| s.parse().ok()) {
                Some(digit) => feed(&mut engine, PuzzleInput::Digit(digit)),
                None => println!("Usage: digit <0-9>"),
            },
            "delete" | "del" => feed(&mut engine, PuzzleInput::Delete),
            "submit" => feed(&mut engine, PuzzleInput::Submit),
            "toggle" => {
                let cell: Option<(usize, usize)> = parts
                    .get(1)
                    .zip(parts.get(2))
                    .and_then(|(r, c)| Some((r.parse().ok()?, c.parse().ok()?)));
                match cell {
                    Some((row, col)) => feed(&mut engine, PuzzleInput::Toggle { row, col }),
                    None => println!("Usage: toggle <row> <col>"),
                }
            }
            "rotate" => match parts.get(1).and_then(|s| s.parse().ok()) {
                Some(ring) => feed(&mut engine, PuzzleInput::Rotate(ring)),
                None => println!("Usage: rotate <ring>"),
            },
            "wait" => match parts.get(1).and_then(|s| s.parse().ok()) {
                Some(millis) => engine.advance(Duration::from_millis(millis)),
                None => println!("Usage: wait <ms>"),
            },
            "exit" => {
                let left = match engine.mode() {
                    GameMode::Puzzle => engine.exit_puzzle(),
                    GameMode::Investigation => engine.exit_investigation(),
                    _ => false,
                };
                if !left {
                    println!("(nothing to leave)");
                }
            }
            "inventory" | "inv" | "i" => {
                let session = engine.session();
                println!("Sanity: {}/{}", session.sanity(), session.sanity_max());
                if session.inventory().is_empty() {
                    println!("  (empty)");
                }
                for item in session.inventory().items() {
                    match engine.content().item(item.as_str()) {
                        Some(details) => println!("  {} - {}", details.name, details.description),
                        None => println!("  {}", item),
                    }
                }
            }
            "restart" => engine.restart(),
            _ => println!("Unknown command: {}. Type 'help' for commands.", cmd),
        }

        print_signals(&mut engine);
    }
}

/// Feed a puzzle input, then let a solve settle on its own.
fn feed(engine: &mut NarrativeEngine, input: PuzzleInput) {
    if engine.mode() != GameMode::Puzzle {
        println!("(no puzzle open)");
        return;
    }
    engine.puzzle_input(input);
    if engine.puzzle().is_some_and(|p| p.is_settling()) {
        run_until(engine, |e| e.mode() != GameMode::Puzzle);
    } else {
        print_puzzle(engine);
    }
}

/// Step timers frame by frame, printing signals as they arrive.
fn run_until(engine: &mut NarrativeEngine, done: impl Fn(&NarrativeEngine) -> bool) {
    while !done(engine) {
        engine.advance(FRAME);
        print_signals(engine);
    }
}

fn prompt(mode: GameMode) -> &'static str {
    match mode {
        GameMode::Menu => "menu",
        GameMode::Cinematic => "cinematic",
        GameMode::Playing => "play",
        GameMode::DiceRolling => "dice",
        GameMode::Investigation => "scene",
        GameMode::Puzzle => "puzzle",
        GameMode::GameOver => "game over",
        GameMode::Victory => "victory",
    }
}

fn print_signals(engine: &mut NarrativeEngine) {
    let mut show_view = false;
    for signal in engine.drain_signals() {
        match signal {
            Signal::Cue(cue) => println!("  [{}]", cue.tag()),
            Signal::Effect(effect) => println!("  [{}]", effect.tag()),
            Signal::Voice(line) => println!("  (voice: {})", line),
            Signal::Cinematic {
                kind,
                video,
                narration,
            } => {
                match kind {
                    CinematicKind::Intro => println!("\n== INTRO ({}) ==", video),
                    CinematicKind::Ending(ending) => {
                        println!("\n== {} ({}) ==", ending.tag(), video)
                    }
                }
                println!("{}", narration);
                println!("(type 'continue')");
            }
            Signal::ItemAcquired(item) => println!("  + {}", item),
            Signal::Tension { cost, sanity } => println!("  sanity -{} => {}", cost, sanity),
            Signal::Narration(text) => println!("  \"{}\"", text),
            Signal::DiceFace(face) => println!("  ... {}", face),
            Signal::DiceResult {
                roll,
                target,
                success,
            } => println!(
                "  rolled {} vs {}: {}",
                roll,
                target,
                if success { "SUCCESS" } else { "FAILURE" }
            ),
            Signal::CodeDisplay(display) => println!("  display: [{}]", display),
            Signal::PuzzleSolved => println!("  * solved *"),
        }
        show_view = true;
    }
    if show_view && matches!(engine.mode(), GameMode::Playing | GameMode::GameOver | GameMode::Victory) {
        look(engine);
    }
}

fn look(engine: &NarrativeEngine) {
    match engine.mode() {
        GameMode::Menu => println!("(press 'restart' to begin)"),
        GameMode::Cinematic => println!("(a cinematic is playing; type 'continue')"),
        GameMode::Playing | GameMode::DiceRolling => {
            let view = engine.view();
            println!("\n[{}]", view.id);
            println!("{}", view.text);
            if let Some(dice) = view.dice {
                println!("\n{} check: roll {} or higher (type 'roll')", dice.stat, dice.target);
                return;
            }
            for option in &view.options {
                let mut tags = Vec::new();
                if let Some(item) = option.locked_by {
                    tags.push(format!("needs {}", item));
                }
                if let Some(cost) = option.sanity_cost {
                    tags.push(format!("sanity -{}", cost));
                }
                if option.investigate {
                    tags.push("investigate".to_string());
                }
                if tags.is_empty() {
                    println!("  {}. {}", option.index, option.text);
                } else {
                    println!("  {}. {} ({})", option.index, option.text, tags.join(", "));
                }
            }
        }
        GameMode::Investigation => {
            if let Some(scene) = engine.investigation_node() {
                println!("\n[{}] {}", scene.id, scene.intro);
            }
            for spot in engine.visible_hotspots() {
                println!(
                    "  {} at ({:.0}, {:.0})",
                    spot.id, spot.region.x, spot.region.y
                );
            }
            println!("  (type 'exit' to leave)");
        }
        GameMode::Puzzle => print_puzzle(engine),
        GameMode::GameOver | GameMode::Victory => {
            let view = engine.view();
            let banner = if engine.mode() == GameMode::Victory {
                "VICTORY"
            } else {
                "GAME OVER"
            };
            println!("\n=== {} ===", banner);
            if let Some(summary) = view.summary {
                println!("{}", summary);
            }
            println!("(type 'restart' to play again)");
        }
    }
}

fn print_puzzle(engine: &NarrativeEngine) {
    let Some(puzzle) = engine.puzzle() else {
        return;
    };
    println!("\n[{}] {}", puzzle.id(), puzzle.description());
    match puzzle.state() {
        PuzzleState::CodeEntry(pad) => println!("  [{}]", pad.display()),
        PuzzleState::GridToggle(grid) => {
            for row in grid.cells().chunks(grid.size().max(1)) {
                let line: String = row.iter().map(|&on| if on { '#' } else { '.' }).collect();
                println!("  {}", line);
            }
        }
        PuzzleState::RingRotation(rings) => {
            for (i, angle) in rings.angles().iter().enumerate() {
                println!("  ring {}: {}°", i, angle);
            }
        }
    }
}

fn describe_outcome(outcome: &HotspotOutcome) {
    match outcome {
        HotspotOutcome::Unknown => println!("(nothing there)"),
        HotspotOutcome::AlreadyResolved => println!("(you've already looked there)"),
        HotspotOutcome::Locked { required } => println!("(it needs the {})", required),
        HotspotOutcome::ItemFound { .. } | HotspotOutcome::PuzzleTriggered(_) => {}
        HotspotOutcome::Flavor { text } => println!("  \"{}\"", text),
    }
}

fn print_usage() {
    println!("Usage: play [--content <dir>] [--seed <n>]");
    println!();
    println!("Walks a story in the terminal. Content defaults to {}.", DEFAULT_CONTENT);
}

fn print_help() {
    println!("Commands:");
    println!("  look                - show the current node, scene, or puzzle");
    println!("  continue            - finish the playing cinematic");
    println!("  choose <n>          - pick option n of the current node");
    println!("  roll                - roll the pending dice challenge");
    println!("  hotspot <id>        - click a hotspot by id");
    println!("  click <x> <y>       - click at scene coordinates (0-100)");
    println!("  digit <d>           - press a keypad digit");
    println!("  delete | submit     - keypad controls");
    println!("  toggle <row> <col>  - press a grid cell");
    println!("  rotate <ring>       - turn a ring one step");
    println!("  wait <ms>           - let timers run");
    println!("  exit                - leave the open puzzle or scene");
    println!("  inventory           - list held items and sanity");
    println!("  restart             - start over from the intro");
    println!("  quit                - exit");
}
