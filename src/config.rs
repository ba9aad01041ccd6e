#[derive(serde::Deserialize)]
/// Top-level configuration of this application.
pub struct Config
{
	/// Configuration options specific to the Bitbucket API and authentication.
	pub bitbucket_api: crate::bitbucket_api::Config,
	/// Which notifications to send and how (optional, all settings have defaults).
	#[serde(default)]
	pub notifier: crate::notifier::Settings,
}

impl Config
{
	/// Attempt to read and parse the configuration from a YAML file.
	///
	/// # Arguments
	/// `path`: Path to the configuration file in YAML format.
	pub fn from_file<P>(path: P) -> Result<Self, crate::Error>
	where
		P: AsRef<std::path::Path>
	{
		let file = std::fs::File::open(&path).map_err(crate::Error::ReadConfigFile)?;
		serde_yaml::from_reader(&file).map_err(crate::Error::ParseConfigFile)
	}
}
