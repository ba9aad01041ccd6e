pub mod bitbucket_api;
#[doc(hidden)]
mod config;
#[doc(hidden)]
mod environment;
#[doc(hidden)]
mod error;
#[doc(hidden)]
mod models;
pub mod notifier;
pub mod payload;
pub mod status;

pub use config::Config;
pub use error::Error;
pub use models::*;

/// Notify Bitbucket of the outcome of a CI build by approving the pull request that triggered it
/// and posting a commit build status.
///
/// All build information defaults to the environment variables Jenkins provides.
#[derive(clap::Parser)]
#[command(version, about)]
struct Arguments
{
	/// Path to the configuration file in YAML format.
	#[arg(long, default_value = "config.yaml")]
	config: std::path::PathBuf,
	/// The Bitbucket webhook payload, or a reference to the environment variable holding it (such
	/// as `$BITBUCKET_PAYLOAD`).
	#[arg(long, env = "BITBUCKET_PAYLOAD")]
	payload: Option<String>,
	/// Read the Bitbucket webhook payload from a file instead.
	#[arg(long)]
	payload_file: Option<std::path::PathBuf>,
	/// The result of the build, leave out while the build is still running.
	#[arg(long, env = "BUILD_RESULT", value_enum, default_value_t = BuildOutcome::NotYetDetermined)]
	result: BuildOutcome,
	/// The full name of the job, used as the key of the build status.
	#[arg(long, env = "JOB_NAME")]
	job_name: String,
	/// The short name of the job, shown in the build status description.
	#[arg(long, env = "JOB_BASE_NAME")]
	display_name: Option<String>,
	#[arg(long, env = "BUILD_ID")]
	build_id: String,
	/// The absolute URL of the build, linked from the build status.
	#[arg(long, env = "BUILD_URL")]
	build_url: Option<String>,
	/// The commit that was built, used if the payload doesn’t name one.
	#[arg(long, env = "GIT_COMMIT")]
	commit: Option<String>,
	/// Skip TLS certificate verification regardless of the configuration.
	#[arg(long)]
	ignore_tls: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()>
{
	pretty_env_logger::init();

	use anyhow::Context as _;
	use clap::Parser as _;

	let arguments = Arguments::parse();

	// Read the config file
	let config = Config::from_file(&arguments.config)
		.with_context(|| format!("could not load {}", arguments.config.display()))?;

	let payload = match (&arguments.payload_file, arguments.payload)
	{
		(Some(payload_file), _) =>
			Some(std::fs::read_to_string(payload_file).map_err(Error::ReadPayloadFile)?),
		// Only expand references, as payload contents may contain dollar signs of their own
		(None, Some(payload)) if payload.trim_start().starts_with('$') =>
			Some(environment::expand(payload.trim())),
		(None, payload) => payload,
	};

	let build = notifier::Build
	{
		payload,
		outcome: arguments.result,
		job_name: arguments.job_name,
		display_name: arguments.display_name,
		build_id: arguments.build_id,
		build_url: arguments.build_url,
		commit: arguments.commit,
	};

	// Initialize a new Bitbucket API client using the configured credentials
	let bitbucket_api_client = bitbucket_api::Client::from_config(config.bitbucket_api)?;

	if arguments.ignore_tls
	{
		bitbucket_api_client.set_ignore_tls(true);
	}

	let notifier = notifier::Notifier::new(bitbucket_api_client, config.notifier);

	log::info!("notifying Bitbucket of {} build #{} of “{}”", build.outcome, build.build_id,
		build.job_name);

	let report = notifier.notify(&build).await.context("could not notify Bitbucket")?;

	log::debug!("approval: {:?}, build status: {:?}", report.approval, report.status);
	log::info!("done");

	Ok(())
}
