/// Matches `${NAME}` and `$NAME` variable references.
#[doc(hidden)]
fn variable_reference() -> &'static regex::Regex
{
	static VARIABLE_REFERENCE: std::sync::OnceLock<regex::Regex> = std::sync::OnceLock::new();

	VARIABLE_REFERENCE.get_or_init(||
		regex::Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_.]*)\}|\$([A-Za-z_][A-Za-z0-9_]*)")
			.expect("this call is infallible because we know the regular expression to be valid"))
}

/// Replace references to environment variables (`${NAME}` or `$NAME`) with their values.
///
/// CI servers commonly expose build parameters such as the webhook payload as environment
/// variables, so configuration values may refer to them. References to undefined variables are
/// kept as is.
pub fn expand(text: &str) -> String
{
	expand_with(text, |name| std::env::var(name).ok())
}

/// Replace variable references using a custom lookup function (for details, see [expand]).
pub fn expand_with<F>(text: &str, lookup: F) -> String
where
	F: Fn(&str) -> Option<String>,
{
	variable_reference()
		.replace_all(text, |captures: &regex::Captures| {
			let name = captures.get(1).or_else(|| captures.get(2))
				.map(|name| name.as_str())
				.unwrap_or_default();

			lookup(name).unwrap_or_else(|| captures[0].to_owned())
		})
		.into_owned()
}
