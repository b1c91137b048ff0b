use std::path::PathBuf;

use clap::Parser;

use crate::remote::ResourceType;

#[derive(Parser, Debug)]
#[clap(author, version, about = "Upload a tree folder to Cloudinary", long_about = None)]
pub struct Cli {
    #[clap(help = "Base folder to upload")]
    pub base_folder: PathBuf,

    #[clap(
        short = 'f',
        long = "config",
        help = "Profile configuration file (default: cloudinary.yaml)"
    )]
    pub config: Option<PathBuf>,

    #[clap(short = 'p', long = "profile", help = "Profile name inside the configuration file")]
    pub profile: Option<String>,

    #[clap(
        short = 'c',
        long = "cloud_name",
        help = "Cloudinary cloud name (used when no profile resolves)"
    )]
    pub cloud_name: Option<String>,

    #[clap(short = 'a', long = "api_key", help = "Cloudinary API key")]
    pub api_key: Option<String>,

    #[clap(short = 's', long = "api_secret", help = "Cloudinary API secret")]
    pub api_secret: Option<String>,

    #[clap(
        short = 'd',
        long = "destination-folder",
        default_value = "",
        hide_default_value(true),
        help = "Destination base folder (default: remote root)"
    )]
    pub destination_folder: String,

    #[clap(
        short = 'x',
        long = "exclude-files",
        help = "Exclude file or directory names; any use replaces the default set"
    )]
    pub exclude_files: Vec<String>,

    #[clap(
        short = 't',
        long = "tag",
        help = "Tags applied to every upload; any use replaces the default set"
    )]
    pub tags: Vec<String>,

    #[clap(short = 'r', long = "resource-type", value_enum, default_value_t = ResourceType::Auto)]
    pub resource_type: ResourceType,

    #[clap(
        long = "unique-filename",
        overrides_with = "no_unique_filename",
        help = "Let the service uniquify colliding public ids"
    )]
    pub unique_filename: bool,
    #[clap(long = "no-unique-filename", help = "Keep public ids exactly as derived (default)")]
    pub no_unique_filename: bool,

    #[clap(
        long = "use-filename",
        overrides_with = "no_use_filename",
        help = "Derive the public id from the original filename (default)"
    )]
    pub use_filename: bool,
    #[clap(long = "no-use-filename", help = "Let the service assign a random public id")]
    pub no_use_filename: bool,

    #[clap(
        short = 'w',
        long = "concurrent_workers",
        default_value_t = 10,
        help = "Number of concurrent upload workers"
    )]
    pub concurrent_workers: usize,

    #[clap(
        short = 'o',
        long = "option",
        value_parser = parse_key_val,
        help = "Free-form KEY=VALUE forwarded verbatim to the upload API"
    )]
    pub options: Vec<(String, String)>,

    #[clap(long, help = "Enumerate and print the plan without uploading")]
    pub dry_run: bool,

    #[clap(long, help = "Print verbose diagnostic logs (also logged to file)")]
    pub verbose: bool,

    #[clap(long, help = "Suppress per-file progress lines and the human summary")]
    pub quiet: bool,

    #[clap(long, help = "Emit a single-line JSON summary")]
    pub json: bool,
}

fn parse_key_val(s: &str) -> Result<(String, String), String> {
    match s.split_once('=') {
        Some((k, v)) if !k.is_empty() => Ok((k.to_string(), v.to_string())),
        _ => Err(format!("expected KEY=VALUE, got '{}'", s)),
    }
}

impl Cli {
    // use_filename defaults on; unique_filename defaults off. The negation
    // flags override their positive twin when both appear.
    pub fn effective_use_filename(&self) -> bool {
        !self.no_use_filename
    }

    pub fn effective_unique_filename(&self) -> bool {
        self.unique_filename
    }
}
