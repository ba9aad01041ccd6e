use crate::{ApprovalDecision, BuildOutcome, BuildState};

/// Whether a build counts as good enough to approve and report as successful.
///
/// Builds that are still running count as successful so that notifications sent from the middle
/// of a pipeline don’t mark the pull request as needing work.
///
/// # Arguments
/// - `outcome`: The current result of the build.
/// - `approve_unstable`: Whether unstable builds (for example, with failing tests) are accepted.
pub fn is_success_or_running(outcome: BuildOutcome, approve_unstable: bool) -> bool
{
	match outcome
	{
		BuildOutcome::Success | BuildOutcome::NotYetDetermined => true,
		BuildOutcome::Unstable => approve_unstable,
		BuildOutcome::Failure | BuildOutcome::NotBuilt | BuildOutcome::Aborted => false,
	}
}

/// Decide on the review status to give the pull request (for arguments, see
/// [is_success_or_running]).
pub fn decide(outcome: BuildOutcome, approve_unstable: bool) -> ApprovalDecision
{
	match is_success_or_running(outcome, approve_unstable)
	{
		true => ApprovalDecision::Approved,
		false => ApprovalDecision::NeedsWork,
	}
}

/// Decide on the state of the commit build status (for arguments, see [is_success_or_running]).
pub fn build_state(outcome: BuildOutcome, approve_unstable: bool) -> BuildState
{
	match is_success_or_running(outcome, approve_unstable)
	{
		true => BuildState::Successful,
		false => BuildState::Failed,
	}
}

#[cfg(test)]
mod tests
{
	use super::*;

	const ALL_OUTCOMES: [BuildOutcome; 6] = [
		BuildOutcome::Success,
		BuildOutcome::Unstable,
		BuildOutcome::Failure,
		BuildOutcome::NotBuilt,
		BuildOutcome::Aborted,
		BuildOutcome::NotYetDetermined,
	];

	#[test]
	fn successful_and_running_builds_are_approved()
	{
		assert_eq!(decide(BuildOutcome::Success, false), ApprovalDecision::Approved);
		assert_eq!(decide(BuildOutcome::NotYetDetermined, false), ApprovalDecision::Approved);
		assert_eq!(build_state(BuildOutcome::NotYetDetermined, false), BuildState::Successful);
	}

	#[test]
	fn unstable_builds_depend_on_configuration()
	{
		assert_eq!(decide(BuildOutcome::Unstable, true), ApprovalDecision::Approved);
		assert_eq!(build_state(BuildOutcome::Unstable, true), BuildState::Successful);
		assert_eq!(decide(BuildOutcome::Unstable, false), ApprovalDecision::NeedsWork);
		assert_eq!(build_state(BuildOutcome::Unstable, false), BuildState::Failed);
	}

	#[test]
	fn broken_builds_need_work()
	{
		for approve_unstable in [false, true]
		{
			for outcome in [BuildOutcome::Failure, BuildOutcome::NotBuilt, BuildOutcome::Aborted]
			{
				assert_eq!(decide(outcome, approve_unstable), ApprovalDecision::NeedsWork);
				assert_eq!(build_state(outcome, approve_unstable), BuildState::Failed);
			}
		}
	}

	#[test]
	fn decision_and_state_agree()
	{
		for approve_unstable in [false, true]
		{
			for outcome in ALL_OUTCOMES
			{
				let approved = decide(outcome, approve_unstable) == ApprovalDecision::Approved;
				let successful = build_state(outcome, approve_unstable) == BuildState::Successful;

				assert_eq!(approved, successful, "{outcome} disagrees");
				assert_eq!(approved, is_success_or_running(outcome, approve_unstable));
			}
		}
	}
}
