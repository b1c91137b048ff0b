use std::sync::Arc;

use anyhow::Result;
use clap::Parser;

use cloudlift::cli::Cli;
use cloudlift::cloudinary::CloudinaryClient;
use cloudlift::config::{ExplicitCredentials, resolve_credentials};
use cloudlift::exclude::ExcludeSet;
use cloudlift::remote::{DEFAULT_TAGS, UploadOptions};
use cloudlift::upload::{self, HandleUploadArgs};

fn main() -> Result<()> {
    let cli = Cli::parse();
    let _log_guard = cloudlift::logging::init_logging(cli.verbose);

    let options = UploadOptions {
        use_filename: cli.effective_use_filename(),
        unique_filename: cli.effective_unique_filename(),
        tags: if cli.tags.is_empty() {
            DEFAULT_TAGS.iter().map(|s| s.to_string()).collect()
        } else {
            cli.tags.clone()
        },
        resource_type: cli.resource_type,
        extra: cli.options.iter().cloned().collect(),
    };
    let excludes = ExcludeSet::from_names(cli.exclude_files.clone());

    let args = HandleUploadArgs {
        base_folder: cli.base_folder.clone(),
        destination_folder: cli.destination_folder.clone(),
        excludes,
        options,
        workers: cli.concurrent_workers,
        verbose: cli.verbose,
        json: cli.json,
        quiet: cli.quiet,
    };

    // The plan needs no credentials; print it and exit before any remote use.
    if cli.dry_run {
        let plan = upload::enumeration::enumerate_tree(
            &args.base_folder,
            &args.excludes,
            &args.destination_folder,
            &args.options,
        )?;
        upload::print_plan(&plan.tasks);
        return Ok(());
    }

    let credentials = resolve_credentials(
        cli.config.as_deref(),
        cli.profile.as_deref(),
        ExplicitCredentials {
            cloud_name: cli.cloud_name.clone(),
            api_key: cli.api_key.clone(),
            api_secret: cli.api_secret.clone(),
        },
    )?;
    let store = Arc::new(CloudinaryClient::new(credentials)?);

    let report = upload::handle_upload(args, store)?;
    if !report.failed.is_empty() {
        std::process::exit(1);
    }
    Ok(())
}
