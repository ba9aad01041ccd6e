/// All errors that may occur while loading the configuration or notifying Bitbucket.
#[derive(Debug, thiserror::Error)]
pub enum Error
{
	#[error("could not read config file")]
	ReadConfigFile(#[source] std::io::Error),
	#[error("could not parse config file")]
	ParseConfigFile(#[source] serde_yaml::Error),
	#[error("could not parse URL “{0}”")]
	ParseUrl(String, #[source] url::ParseError),
	#[error("no credentials configured with ID “{0}”")]
	UnknownCredential(String),

	#[error("could not create HTTP client")]
	CreateHttpClient(#[source] reqwest::Error),

	#[error("could not read payload file")]
	ReadPayloadFile(#[source] std::io::Error),
	#[error("could not parse Bitbucket payload")]
	MalformedPayload(#[source] serde_json::Error),
	#[error("unrecognized Bitbucket event kind {}", .0.as_deref().unwrap_or("(missing)"))]
	UnrecognizedEventKind(Option<String>),
	#[error("approving requires a pull request event payload")]
	PayloadTypeMismatch,
	#[error("could not determine the commit hash of this build")]
	MissingCommitHash,
	#[error("freestyle notifications require a configured repository owner and slug")]
	MissingFreestyleRepository,

	#[error("could not encode request body")]
	EncodeRequestBody(#[source] serde_json::Error),
	#[error("could not make Bitbucket API request")]
	HttpTransport(#[source] reqwest::Error),
	#[error("received unexpected Bitbucket API response (status code {status_code}): {response_body}")]
	HttpStatus
	{
		status_code: reqwest::StatusCode,
		url: url::Url,
		response_body: String,
	},
}
