//! Check external tools and directories.

use slideshow_common::config::{config_file_path, AppConfig};
use slideshow_toolchain::{SystemRunner, ToolRunner};

pub fn run(config: &AppConfig) -> anyhow::Result<()> {
    println!("Slideshow System Check");
    println!("{}", "=".repeat(50));

    let runner = SystemRunner::new();
    let mut missing = Vec::new();
    for program in [&config.tools.ffmpeg, &config.tools.ffprobe] {
        if runner.is_available(program) {
            println!("[OK] {program}");
        } else {
            println!("[MISSING] {program} is not installed or not on PATH");
            missing.push(program.as_str());
        }
    }

    let config_path = config_file_path();
    if config_path.exists() {
        println!("[OK] Config: {}", config_path.display());
    } else {
        println!("[--] Config: {} (not present, using defaults)", config_path.display());
    }
    println!("[--] Work dir: {}", config.resolved_work_dir().display());
    println!("[--] Log dir: {}", config.resolved_log_dir().display());

    println!();
    if missing.is_empty() {
        println!("All required tools are available. Slideshow is ready.");
        Ok(())
    } else {
        anyhow::bail!("Missing required tools: {}", missing.join(", "))
    }
}
