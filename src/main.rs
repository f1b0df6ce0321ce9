mod app;
mod input_path;

use anyhow::Result;

fn main() -> Result<()> {
    app::run()
}
