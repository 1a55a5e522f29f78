//! Default TOML config template with inline documentation comments.

pub(crate) fn default_config_toml() -> &'static str {
    r##"# Tandem Configuration
# Only override what you want to change -- missing fields use defaults.

[openai]
# base_url = "https://api.openai.com/v1"
# api_key_env = "OPENAI_API_KEY"   # variable holding the key
# organization = "org-..."
# poll_interval_ms = 1000          # 1-60000
# run_timeout_secs = 600           # 1-3600
# request_timeout_secs = 120       # 1-600

[assistant]
# id = "asst_..."                  # reuse an existing assistant
# name = "tandem"
# model = "gpt-4o-mini"            # used when creating an assistant
# instructions = "You are a helpful assistant."
# thread_id = "thread_..."         # resume an existing thread

[session]
# max_tool_rounds = 10             # 1-100

[logging]
# level = "tandem=info"            # RUST_LOG overrides this
"##
}
