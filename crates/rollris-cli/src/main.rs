mod command;
mod effects;
mod high_score;
mod input;
mod theme;
mod tui;
mod ui;

fn main() -> anyhow::Result<()> {
    command::run()
}
