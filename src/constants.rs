// AppDeck Constants

// Paths
pub const DB_FILENAME: &str = "appdeck.db";
pub const OPEN_FOLDER: &str = "open";
pub const DEFAULT_MANIFEST: &str = "apps.json";

// Config environment overrides
pub const ENV_HOME: &str = "APPDECK_HOME";
pub const ENV_MANIFEST: &str = "APPDECK_MANIFEST";

// Project identity for platform data directories
pub const PROJECT_QUALIFIER: &str = "org";
pub const PROJECT_ORGANIZATION: &str = "appdeck";
pub const PROJECT_APPLICATION: &str = "appdeck";

// Network
pub const HTTP_TIMEOUT_SECONDS: u64 = 15;
pub const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

// SQLite
pub const BUSY_TIMEOUT_MS: u32 = 5000;

// App files
pub const APP_EXTENSIONS: [&str; 2] = ["html", "htm"];
pub const RESERVED_INDEX: &str = "index.html";
pub const RESERVED_PREFIX: &str = "dashboard.";

// Record ids
pub const APP_ID_PREFIX: &str = "app_";

// Missing order sorts after every explicit order
pub const ORDER_SENTINEL: i64 = i64::MAX;

// Meta keys
pub const META_FOLDER_HANDLE: &str = "folder_handle";

// Icons
pub const FALLBACK_GLYPH_IMPORT: &str = "\u{1F4C4}"; // page
pub const FALLBACK_GLYPH_CARD: &str = "\u{1F4E6}"; // package

// Card badges
pub const BADGE_BUNDLED: &str = "Bundle";
pub const BADGE_FOLDER: &str = "Folder";
pub const BADGE_FILE: &str = "Import";
