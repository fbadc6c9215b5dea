//! Quadsim - interactive quad tree simulator.
//!
//! Reads commands from stdin, mutates the session and reprints the board
//! after every change.

use quadtree::Point;
use simulator::{Config, Session, TextRenderer};
use std::io::{self, BufRead, Write};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

const HELP: &str = "\
Commands:
  add <x> <y>     add a point to the board
  scatter <n>     add n random points
  undo            remove the most recently added point
  clear           remove all points
  capacity <n>    rebuild the tree with node capacity n (1-10)
  points          list all points in the tree
  show            reprint the board
  help            show this help
  quit            exit";

fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("Quad Tree Simulator v{}", env!("CARGO_PKG_VERSION"));

    let config = Config::load()?;
    info!("Loaded configuration");
    info!("  Board: {}x{}", config.board.size, config.board.size);
    info!("  Node capacity: {}", config.tree.capacity);

    let mut session = Session::new(&config)?;
    let renderer = TextRenderer::new(65, 33);

    println!("{HELP}");
    print_board(&renderer, &session);
    prompt()?;

    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        let line = line?;
        if !dispatch(&mut session, &renderer, line.trim()) {
            break;
        }
        prompt()?;
    }

    Ok(())
}

fn prompt() -> io::Result<()> {
    let mut stdout = io::stdout();
    write!(stdout, "> ")?;
    stdout.flush()
}

/// Handle one command line. Returns `false` when the loop should exit.
fn dispatch(session: &mut Session, renderer: &TextRenderer, line: &str) -> bool {
    let mut parts = line.split_whitespace();
    let Some(command) = parts.next() else {
        return true;
    };
    let args: Vec<&str> = parts.collect();

    match (command, args.as_slice()) {
        ("add", [x, y]) => match (x.parse::<f64>(), y.parse::<f64>()) {
            (Ok(x), Ok(y)) => {
                let point = Point::new(x, y);
                if session.bounds().contains(point) {
                    session.add(point);
                    print_board(renderer, session);
                } else {
                    warn!("point ({x}, {y}) is outside the board");
                }
            }
            _ => warn!("usage: add <x> <y>"),
        },
        ("scatter", [n]) => match n.parse::<usize>() {
            Ok(n) => {
                session.scatter(n);
                print_board(renderer, session);
            }
            Err(_) => warn!("usage: scatter <n>"),
        },
        ("undo", []) => match session.undo() {
            Some(point) => {
                info!("removed ({}, {})", point.x, point.y);
                print_board(renderer, session);
            }
            None => warn!("nothing to undo"),
        },
        ("clear", []) => {
            session.clear();
            print_board(renderer, session);
        }
        ("capacity", [n]) => match n.parse::<usize>() {
            Ok(n) => match session.set_capacity(n) {
                Ok(()) => {
                    info!("node capacity is now {n}");
                    print_board(renderer, session);
                }
                Err(e) => warn!("{e}"),
            },
            Err(_) => warn!("usage: capacity <n>"),
        },
        ("points", []) => {
            let mut points: Vec<Point> = session.tree().points().into_iter().collect();
            points.sort_by(|a, b| a.x.total_cmp(&b.x).then(a.y.total_cmp(&b.y)));
            for point in &points {
                println!("({}, {})", point.x, point.y);
            }
            println!("{} point(s)", points.len());
        }
        ("show", []) => print_board(renderer, session),
        ("help", []) => println!("{HELP}"),
        ("quit" | "exit", []) => return false,
        _ => warn!("unknown command: {line} (try 'help')"),
    }

    true
}

fn print_board(renderer: &TextRenderer, session: &Session) {
    println!("{}", renderer.render(session.tree()));
    println!(
        "{} point(s), node capacity {}",
        session.tree().len(),
        session.capacity()
    );
}
