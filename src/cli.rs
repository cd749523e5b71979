use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "vidshelf")]
#[command(author, version, about = "Serve a local video library over HTTP and convert it to MP4")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the HTTP server
    Serve {
        /// Host to bind to
        #[arg(long)]
        host: Option<String>,

        /// Port to listen on
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Convert every video under the source directory that has no MP4 yet
    Convert {
        /// Directory tree holding the original videos
        #[arg(long)]
        source: Option<PathBuf>,

        /// Directory receiving converted MP4 files
        #[arg(long)]
        output: Option<PathBuf>,

        /// Do not draw the progress bar
        #[arg(long)]
        quiet: bool,
    },

    /// Write the catalog JSON describing the storage root
    Catalog {
        /// Destination of the JSON file
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Check that ffmpeg and ffprobe are available
    CheckTools,
}
