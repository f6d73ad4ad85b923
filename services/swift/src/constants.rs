use percent_encoding::AsciiSet;
use percent_encoding::NON_ALPHANUMERIC;

// Headers used in swift services.
pub const X_AUTH_TOKEN: &str = "x-auth-token";
pub const X_AUTH_USER: &str = "x-auth-user";
pub const X_AUTH_KEY: &str = "x-auth-key";
pub const X_STORAGE_URL: &str = "x-storage-url";
pub const X_AUTH_TOKEN_EXPIRES: &str = "x-auth-token-expires";
pub const X_ACCOUNT_META_PREFIX: &str = "x-account-meta-";
pub const X_REMOVE_ACCOUNT_META_PREFIX: &str = "x-remove-account-meta-";

// Account metadata keys holding the temp url secrets.
pub const TEMP_URL_KEY: &str = "Temp-URL-Key";
pub const TEMP_URL_KEY_2: &str = "Temp-URL-Key-2";

// Query parameters of a temporary url.
pub const TEMP_URL_SIG: &str = "temp_url_sig";
pub const TEMP_URL_EXPIRES: &str = "temp_url_expires";
pub const TEMP_URL_PREFIX: &str = "temp_url_prefix";
pub const TEMP_URL_IP_RANGE: &str = "temp_url_ip_range";
pub const INLINE: &str = "inline";
pub const FILENAME: &str = "filename";

// Env values used in swift services.
pub const SWIFT_STORAGE_URL: &str = "SWIFT_STORAGE_URL";
pub const SWIFT_AUTH_TOKEN: &str = "SWIFT_AUTH_TOKEN";
pub const SWIFT_AUTH_URL: &str = "SWIFT_AUTH_URL";
pub const SWIFT_USER: &str = "SWIFT_USER";
pub const SWIFT_KEY: &str = "SWIFT_KEY";
pub const SWIFT_TEMP_URL_KEY: &str = "SWIFT_TEMP_URL_KEY";
pub const SWIFT_TEMP_URL_KEY_2: &str = "SWIFT_TEMP_URL_KEY_2";
pub const SWIFT_TEMP_URL_DIGEST: &str = "SWIFT_TEMP_URL_DIGEST";

/// AsciiSet for container and object names placed into a url path.
///
/// Everything except unreserved characters and `/` is encoded, so pseudo
/// directories in object names survive.
pub static PATH_ENCODE_SET: AsciiSet = NON_ALPHANUMERIC
    .remove(b'/')
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// AsciiSet for query values such as `filename` and base64 signatures.
pub static QUERY_ENCODE_SET: AsciiSet = NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');
