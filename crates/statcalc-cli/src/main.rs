mod command;
mod render;
mod settings;
mod util;

fn main() -> anyhow::Result<()> {
    command::run()
}
