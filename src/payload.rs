use crate::Payload;

/// Interpret a Bitbucket Server webhook event payload.
///
/// Push events (`repo:*`) and pull request events (`pr:*`) are supported. Individual fields that
/// are missing from the payload are returned as empty strings. Only a document that is not valid
/// JSON or that has an unknown or missing `eventKey` is rejected.
///
/// # Arguments
/// `raw`: The payload as received with the webhook event.
pub fn parse(raw: &str) -> Result<Payload, crate::Error>
{
	log::debug!("Bitbucket payload: {raw}");

	let document: serde_json::Value = serde_json::from_str(raw)
		.map_err(|error|
		{
			log::error!("could not parse Bitbucket payload: {error}");
			crate::Error::MalformedPayload(error)
		})?;

	let event_key = document.get("eventKey")
		.and_then(serde_json::Value::as_str)
		.ok_or(crate::Error::UnrecognizedEventKind(None))?;

	if event_key.starts_with("repo:")
	{
		return Ok(Payload::Push
		{
			commit_hash: text_at(&document, "/changes/0/toHash"),
		});
	}

	if event_key.starts_with("pr:")
	{
		return Ok(Payload::PullRequest
		{
			commit_hash: text_at(&document, "/pullRequest/fromRef/latestCommit"),
			project_key: text_at(&document, "/pullRequest/fromRef/repository/project/key"),
			repo_slug: text_at(&document, "/pullRequest/fromRef/repository/slug"),
			pull_request_id: text_at(&document, "/pullRequest/id"),
		});
	}

	Err(crate::Error::UnrecognizedEventKind(Some(event_key.to_owned())))
}

/// Look up a scalar value by JSON pointer and render it as text, or return an empty string.
#[doc(hidden)]
fn text_at(document: &serde_json::Value, pointer: &str) -> String
{
	match document.pointer(pointer)
	{
		Some(serde_json::Value::String(text)) => text.clone(),
		// Bitbucket Server sends pull request IDs as numbers
		Some(serde_json::Value::Number(number)) => number.to_string(),
		Some(serde_json::Value::Bool(value)) => value.to_string(),
		_ =>
		{
			log::debug!("Bitbucket payload has no value at “{pointer}”");
			String::new()
		},
	}
}
