/// The relevant parts of a Bitbucket webhook event payload.
///
/// Fields that could not be extracted from the payload are empty strings, never absent.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Payload
{
	/// A `repo:*` event, such as `repo:refs_changed`.
	Push
	{
		/// The hash of the commit the ref was changed to.
		commit_hash: String,
	},
	/// A `pr:*` event, such as `pr:opened` or `pr:from_ref_updated`.
	PullRequest
	{
		/// The latest commit on the pull request’s source branch.
		commit_hash: String,
		/// The key of the project the source repository belongs to.
		project_key: String,
		/// The slug of the source repository, as included in URLs.
		repo_slug: String,
		/// The ID of the pull request within its repository.
		pull_request_id: String,
	},
}

impl Payload
{
	/// The commit this event refers to, regardless of the event kind.
	pub fn commit_hash(&self) -> &str
	{
		match self
		{
			Self::Push{commit_hash} => commit_hash,
			Self::PullRequest{commit_hash, ..} => commit_hash,
		}
	}
}

/// Terminal (or current) result of a build, using Jenkins’ vocabulary.
#[derive(Clone, Copy, Debug, Eq, PartialEq, clap::ValueEnum)]
#[value(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BuildOutcome
{
	Success,
	Unstable,
	Failure,
	NotBuilt,
	Aborted,
	/// The build is still running, for example when notifying from the middle of a pipeline.
	NotYetDetermined,
}

impl std::fmt::Display for BuildOutcome
{
	fn fmt(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result
	{
		let name = match self
		{
			Self::Success => "SUCCESS",
			Self::Unstable => "UNSTABLE",
			Self::Failure => "FAILURE",
			Self::NotBuilt => "NOT_BUILT",
			Self::Aborted => "ABORTED",
			Self::NotYetDetermined => "NOT_YET_DETERMINED",
		};

		write!(formatter, "{name}")
	}
}

/// Review status of a pull request participant.
#[derive(Clone, Copy, Debug, Eq, PartialEq, serde::Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ApprovalDecision
{
	Approved,
	NeedsWork,
	Unapproved,
}

/// State of a commit build status.
#[derive(Clone, Copy, Debug, Eq, PartialEq, serde::Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BuildState
{
	Successful,
	Failed,
}

/// Everything about a build that ends up in a commit build status, assembled per notification.
#[derive(Clone, Debug)]
pub struct BuildOutcomeSummary
{
	pub is_success_or_running: bool,
	pub state: BuildState,
	/// Identifies the build job on Bitbucket. Statuses with the same key replace each other.
	pub display_key: String,
	pub display_name: String,
	pub external_url: String,
	/// The first seven characters of the commit hash.
	pub short_commit: String,
}

/// Partial user data model for the pull request participants API.
#[derive(Debug, serde::Serialize)]
pub struct User<'a>
{
	/// The user’s slug.
	pub name: &'a str,
}

/// Request body of the Bitbucket Server API call updating a pull request participant’s status.
#[derive(Debug, serde::Serialize)]
pub struct ParticipantStatusRequest<'a>
{
	pub user: User<'a>,
	pub approved: bool,
	pub status: ApprovalDecision,
}

/// Request body of the build status API calls.
#[derive(Debug, serde::Serialize)]
pub struct BuildStatusRequest<'a>
{
	pub state: BuildState,
	pub key: &'a str,
	pub name: &'a str,
	pub url: &'a str,
	pub description: &'a str,
}
