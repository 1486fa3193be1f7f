//! windowcharmer - zone tiling for X11 window managers.
//!
//! With an action argument the binary tiles the focused window (or re-tiles
//! the desktop) and exits. With `--daemonize` it captures modifier chords and
//! runs the bound actions until interrupted.

fn main() {
    if let Err(err) = windowcharmer_lib::cli::run() {
        eprintln!("windowcharmer: {}", err.report());
        std::process::exit(1);
    }
}
