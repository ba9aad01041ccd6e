use crate::{ApprovalDecision, BuildOutcome, BuildOutcomeSummary, Payload};

/// Which of the two notifications to send.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ApprovalMethod
{
	ApproveOnly,
	StatusOnly,
	Both,
}

impl ApprovalMethod
{
	pub fn approves(self) -> bool
	{
		self != Self::StatusOnly
	}

	pub fn posts_status(self) -> bool
	{
		self != Self::ApproveOnly
	}
}

// Configurations only ever name the two restricted methods, anything else means both
impl From<String> for ApprovalMethod
{
	fn from(method: String) -> Self
	{
		match method.as_str()
		{
			"approveOnly" => Self::ApproveOnly,
			"statusOnly" => Self::StatusOnly,
			_ => Self::Both,
		}
	}
}

impl<'de> serde::Deserialize<'de> for ApprovalMethod
{
	fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
	where
		D: serde::Deserializer<'de>,
	{
		let method: String = serde::Deserialize::deserialize(deserializer)?;

		Ok(method.into())
	}
}

/// The kind of build step to behave like.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Flavor
{
	/// Build triggered by a Bitbucket Server webhook. Updates the pull request participant status
	/// and fails if Bitbucket rejects a request.
	#[default]
	Webhook,
	/// Classic freestyle job. Approves the commit on Bitbucket Cloud and only logs rejected
	/// requests.
	Freestyle,
}

/// Review status given to pull requests of builds that aren’t approved.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Rejection
{
	#[default]
	NeedsWork,
	Unapproved,
}

impl From<Rejection> for ApprovalDecision
{
	fn from(rejection: Rejection) -> Self
	{
		match rejection
		{
			Rejection::NeedsWork => Self::NeedsWork,
			Rejection::Unapproved => Self::Unapproved,
		}
	}
}

/// Bitbucket Cloud repository that freestyle jobs report to.
#[derive(Debug, serde::Deserialize)]
pub struct FreestyleRepository
{
	/// The workspace or user owning the repository. May refer to environment variables.
	owner: String,
	/// The repository slug. May refer to environment variables.
	slug: String,
}

/// Settings controlling which notifications are sent and how.
#[derive(Debug, Default, serde::Deserialize)]
pub struct Settings
{
	/// Approve unstable builds, such as builds with failing tests (optional, default: `false`).
	#[serde(default)]
	pub approve_unstable: bool,
	/// `approveOnly`, `statusOnly`, or any other value for both (optional). Configurations that
	/// predate this setting only approved, so this is also what happens if it’s missing.
	#[serde(default)]
	pub approval_method: Option<ApprovalMethod>,
	/// Review status for builds that aren’t approved (optional, default: `needs_work`).
	#[serde(default)]
	pub rejection: Rejection,
	/// Optional, default: `webhook`.
	#[serde(default)]
	pub flavor: Flavor,
	/// Required for the freestyle flavor only.
	#[serde(default)]
	pub freestyle: Option<FreestyleRepository>,
}

impl Settings
{
	pub fn approval_method(&self) -> ApprovalMethod
	{
		self.approval_method.unwrap_or(ApprovalMethod::ApproveOnly)
	}
}

/// What is known about the build to report on.
#[derive(Clone, Debug)]
pub struct Build
{
	/// The webhook event payload that triggered the build, if any.
	pub payload: Option<String>,
	pub outcome: BuildOutcome,
	/// The full name of the job, used as the build status key.
	pub job_name: String,
	/// The human-readable name of the job, defaults to the full name.
	pub display_name: Option<String>,
	pub build_id: String,
	/// The absolute URL of the build’s page on the CI server.
	pub build_url: Option<String>,
	/// The commit that was built, used when the payload doesn’t tell.
	pub commit: Option<String>,
}

/// What happened in one phase of a notification.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum PhaseOutcome
{
	Skipped,
	Sent,
	/// Bitbucket rejected the request, but the flavor tolerates it.
	Rejected(reqwest::StatusCode),
}

/// The result of a notification.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Report
{
	pub approval: PhaseOutcome,
	pub status: PhaseOutcome,
}

/// Notifies Bitbucket of build outcomes by approving and posting build statuses.
pub struct Notifier
{
	#[doc(hidden)]
	client: crate::bitbucket_api::Client,
	#[doc(hidden)]
	settings: Settings,
}

impl Notifier
{
	pub fn new(client: crate::bitbucket_api::Client, settings: Settings) -> Self
	{
		Self
		{
			client,
			settings,
		}
	}

	/// Send the configured notifications for a build, approving first and posting the build status
	/// second.
	///
	/// A payload that can’t be parsed is logged and otherwise ignored, unless the approval needs a
	/// pull request to approve, in which case this fails with
	/// [PayloadTypeMismatch](crate::Error::PayloadTypeMismatch). Requests that don’t reach
	/// Bitbucket always fail the notification, while requests rejected by Bitbucket only do so in
	/// the webhook flavor.
	pub async fn notify(&self, build: &Build) -> Result<Report, crate::Error>
	{
		let payload = match build.payload.as_deref()
		{
			Some(raw) => crate::payload::parse(raw)
				.map_err(|error| log::warn!("ignoring Bitbucket payload: {error}"))
				.ok(),
			None =>
			{
				log::warn!("no Bitbucket payload provided");
				None
			},
		};

		let approval_method = self.settings.approval_method();

		let approval = match approval_method.approves()
		{
			true => self.approve(payload.as_ref(), build).await?,
			false =>
			{
				log::info!("skipping approval because only the build status is posted");
				PhaseOutcome::Skipped
			},
		};

		let status = match approval_method.posts_status()
		{
			true => self.post_build_status(payload.as_ref(), build).await?,
			false =>
			{
				log::info!("skipping build status because only approvals are sent");
				PhaseOutcome::Skipped
			},
		};

		Ok(Report{approval, status})
	}

	#[doc(hidden)]
	async fn approve(&self, payload: Option<&Payload>, build: &Build)
		-> Result<PhaseOutcome, crate::Error>
	{
		let decision = match crate::status::decide(build.outcome, self.settings.approve_unstable)
		{
			ApprovalDecision::Approved => ApprovalDecision::Approved,
			_ => self.settings.rejection.into(),
		};

		match self.settings.flavor
		{
			Flavor::Webhook =>
			{
				let Some(Payload::PullRequest{project_key, repo_slug, pull_request_id, ..}) = payload
				else
				{
					log::error!("cannot approve because the build was not triggered by a pull request \
						event");
					return Err(crate::Error::PayloadTypeMismatch);
				};

				let username = self.client.username();
				let path = format!("rest/api/1.0/projects/{project_key}/repos/{repo_slug}\
					/pull-requests/{pull_request_id}/participants/{username}");
				let body = crate::ParticipantStatusRequest
				{
					user: crate::User{name: username},
					approved: true,
					status: decision,
				};

				log::info!("setting status of pull request #{pull_request_id} in \
					“{project_key}/{repo_slug}” to {decision:?} ({} build)", build.outcome);

				self.tolerate_rejection(self.client.put(path, &body).await)
			},
			Flavor::Freestyle =>
			{
				if decision != ApprovalDecision::Approved
				{
					log::info!("skipping approval because build is {}", build.outcome);
					return Ok(PhaseOutcome::Skipped);
				}

				let (owner, slug) = self.freestyle_repository()?;
				let commit_hash = commit_hash(payload, build)?;
				let path = format!("repositories/{owner}/{slug}/commit/{commit_hash}/approve");

				self.tolerate_rejection(self.client.post(path, crate::bitbucket_api::NO_BODY).await)
			},
		}
	}

	#[doc(hidden)]
	async fn post_build_status(&self, payload: Option<&Payload>, build: &Build)
		-> Result<PhaseOutcome, crate::Error>
	{
		let commit_hash = commit_hash(payload, build)?;
		let summary = summarize(build, commit_hash, self.settings.approve_unstable);

		let (path, name) = match self.settings.flavor
		{
			Flavor::Webhook =>
				(format!("rest/build-status/1.0/commits/{commit_hash}"), summary.display_key.clone()),
			Flavor::Freestyle =>
			{
				let (owner, slug) = self.freestyle_repository()?;

				(format!("repositories/{owner}/{slug}/commit/{commit_hash}/statuses/build"),
					format!("Build #{}", build.build_id))
			},
		};

		let description = format!("{} {}", summary.display_name, summary.short_commit);
		let body = build_status_request(&summary, &name, &description);

		log::info!("posting {:?} build status for commit {commit_hash}", body.state);

		self.tolerate_rejection(self.client.post(path, Some(&body)).await)
	}

	/// Turn rejected requests into a successful outcome for flavors that only log them.
	#[doc(hidden)]
	fn tolerate_rejection(&self, result: Result<(), crate::Error>)
		-> Result<PhaseOutcome, crate::Error>
	{
		match result
		{
			Ok(()) => Ok(PhaseOutcome::Sent),
			Err(crate::Error::HttpStatus{status_code, ..}) if self.settings.flavor == Flavor::Freestyle =>
			{
				log::warn!("continuing despite Bitbucket rejecting the request");
				Ok(PhaseOutcome::Rejected(status_code))
			},
			Err(error) => Err(error),
		}
	}

	/// The configured freestyle repository owner and slug with environment variables expanded.
	#[doc(hidden)]
	fn freestyle_repository(&self) -> Result<(String, String), crate::Error>
	{
		let repository = self.settings.freestyle.as_ref()
			.ok_or(crate::Error::MissingFreestyleRepository)?;

		Ok((crate::environment::expand(&repository.owner),
			crate::environment::expand(&repository.slug)))
	}
}

/// The commit to report on, preferring the one from the payload over the one checked out.
#[doc(hidden)]
fn commit_hash<'a>(payload: Option<&'a Payload>, build: &'a Build) -> Result<&'a str, crate::Error>
{
	payload.map(Payload::commit_hash)
		.filter(|commit_hash| !commit_hash.is_empty())
		.or(build.commit.as_deref().filter(|commit_hash| !commit_hash.is_empty()))
		.ok_or_else(||
		{
			log::error!("could not get commit hash from payload or build");
			crate::Error::MissingCommitHash
		})
}

/// Assemble what the build status reports about a build.
pub fn summarize(build: &Build, commit_hash: &str, approve_unstable: bool) -> BuildOutcomeSummary
{
	let external_url = match &build.build_url
	{
		Some(build_url) => build_url.clone(),
		None => format!("PLEASE SET JENKINS ROOT URL IN GLOBAL CONFIG job/{}/{}/", build.job_name,
			build.build_id),
	};

	BuildOutcomeSummary
	{
		is_success_or_running: crate::status::is_success_or_running(build.outcome, approve_unstable),
		state: crate::status::build_state(build.outcome, approve_unstable),
		display_key: build.job_name.clone(),
		display_name: build.display_name.clone().unwrap_or_else(|| build.job_name.clone()),
		external_url,
		short_commit: commit_hash.chars().take(7).collect(),
	}
}

/// Build the body of a build status request.
///
/// # Arguments
/// - `summary`: The build to report on.
/// - `name`: The name shown for the build on Bitbucket.
/// - `description`: A short text shown along with the name.
pub fn build_status_request<'a>(summary: &'a BuildOutcomeSummary, name: &'a str,
	description: &'a str)
	-> crate::BuildStatusRequest<'a>
{
	crate::BuildStatusRequest
	{
		state: summary.state,
		key: &summary.display_key,
		name,
		url: &summary.external_url,
		description,
	}
}
