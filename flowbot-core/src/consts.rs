//! Environment variable names and defaults shared across flowbot components.

/// Jira host, with or without scheme (https is assumed).
pub const ENV_JIRA_HOST: &str = "JIRA_HOST";

/// Jira project key the worker polls.
pub const ENV_JIRA_PROJECT_KEY: &str = "JIRA_PROJECT_KEY";

/// Jira login used when no `.netrc` entry matches.
pub const ENV_JIRA_USERNAME: &str = "JIRA_USERNAME";

/// Jira API token used when no `.netrc` entry matches.
pub const ENV_JIRA_API_TOKEN: &str = "JIRA_API_TOKEN";

/// Poll interval override in seconds.
pub const ENV_WORKER_POLL_INTERVAL: &str = "WORKER_POLL_INTERVAL";

/// Default seconds between poll cycles.
pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 30;

/// Default per-request timeout for tracker calls.
pub const DEFAULT_JIRA_TIMEOUT_SECS: u64 = 30;

/// Default page size for issue searches.
pub const DEFAULT_MAX_RESULTS: u32 = 50;

/// Default ceiling for `gh`/`git` subprocess calls.
pub const DEFAULT_COMMAND_TIMEOUT_SECS: u64 = 300;

/// Default base branch for GitHub sync.
pub const DEFAULT_BASE_BRANCH: &str = "develop";
