use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use pendulum_core::consts::DEFAULT_FRAME_RATE;

use super::open_source;

#[derive(Args)]
pub struct InfoArgs {
    /// Input SER file or image directory
    pub input: PathBuf,

    /// Frame rate assumed when the source has no timestamps
    #[arg(long, default_value_t = DEFAULT_FRAME_RATE)]
    pub fps: f64,
}

pub fn run(args: &InfoArgs) -> Result<()> {
    let (_, info) = open_source(&args.input, args.fps)?;

    println!("Source:      {}", info.filename.display());
    println!("Frames:      {}", info.total_frames);
    println!("Dimensions:  {}x{}", info.width, info.height);
    println!("Bit depth:   {}", info.bit_depth);
    println!("Frame rate:  {:.3} fps", info.frame_rate);
    println!("Format:      {}", info.description);

    if info.frame_rate > 0.0 {
        let seconds = info.total_frames as f64 / info.frame_rate;
        println!("Duration:    {:.2} s", seconds);
    }

    Ok(())
}
