//! Custom assertion macros

/// Assert that a string contains a substring
#[macro_export]
macro_rules! assert_contains {
    ($haystack:expr, $needle:expr) => {
        assert!(
            $haystack.contains($needle),
            "Expected '{}' to contain '{}'",
            $haystack,
            $needle
        );
    };
}

/// Assert the JSON error envelope of a response
#[macro_export]
macro_rules! assert_error_envelope {
    ($response:expr, $status:expr, $message:expr) => {
        assert_eq!($response.status, $status, "body: {}", $response.body);
        assert_eq!($response.body["statusCode"], $status.as_u16());
        assert_eq!($response.body["success"], false);
        assert_eq!($response.body["message"], $message);
    };
}
