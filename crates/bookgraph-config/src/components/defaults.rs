//! Default values shared by several sections

/// OpenAI-compatible endpoint used for completions
pub const DEFAULT_CHAT_ENDPOINT: &str = "https://api.deepseek.com";
/// Completion model
pub const DEFAULT_CHAT_MODEL: &str = "deepseek-chat";
/// Environment variable holding the completion API key
pub const DEFAULT_CHAT_API_KEY_ENV: &str = "DEEPSEEK_API_KEY";
/// Upper bound on answer length
pub const DEFAULT_CHAT_MAX_TOKENS: u32 = 3000;
/// Deterministic sampling
pub const DEFAULT_TEMPERATURE: f32 = 0.0;
/// Completion request timeout
pub const DEFAULT_CHAT_TIMEOUT_SECS: u64 = 120;

/// Embedding model (BGE-M3, 1024 dimensions)
pub const DEFAULT_EMBEDDING_MODEL: &str = "bge-m3";
/// Dimension of [`DEFAULT_EMBEDDING_MODEL`]
pub const DEFAULT_EMBEDDING_DIMENSIONS: usize = 1024;
/// Environment variable holding the embedding API key (OpenAI provider only)
pub const DEFAULT_EMBEDDING_API_KEY_ENV: &str = "OPENAI_API_KEY";
/// Texts per embedding request
pub const DEFAULT_EMBEDDING_BATCH_SIZE: usize = 16;
/// Embedding request timeout
pub const DEFAULT_EMBEDDING_TIMEOUT_SECS: u64 = 60;

/// Triplets kept per record
pub const DEFAULT_MAX_TRIPLETS_PER_RECORD: usize = 10;
/// Completion budget for one extraction call
pub const DEFAULT_EXTRACTION_MAX_TOKENS: u32 = 1024;
/// Extraction requests in flight
pub const DEFAULT_EXTRACTION_CONCURRENCY: usize = 4;

/// Records matched per query
pub const DEFAULT_TOP_K: usize = 5;
/// Graph expansion depth
pub const DEFAULT_MAX_HOPS: usize = 1;
/// Rendered context budget in characters
pub const DEFAULT_MAX_CONTEXT_CHARS: usize = 48_000;
/// Related records appended when expansion is enabled
pub const DEFAULT_MAX_RELATED_RECORDS: usize = 5;

/// CSV corpus read by `build`
pub const DEFAULT_DATA_FILE: &str = "data/clean_data_100.csv";
/// Index directory written by `build` and read by `query`
pub const DEFAULT_PERSIST_DIR: &str = "./storage_graph_csv";
