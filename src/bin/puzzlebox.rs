use anyhow::Result;

fn main() -> Result<()> {
    puzzlebox::cli::run()
}
