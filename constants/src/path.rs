/// Directory under the asset root that holds `chunk_<index>.json` files.
pub const RELATIVE_CHUNK_PATH: &str = "chunks";

/// File stem shared by every chunk.
pub const CHUNK_FILE_PREFIX: &str = "chunk_";
