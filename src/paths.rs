use std::{path::PathBuf, sync::LazyLock};

pub static DEFAULT_BUILD_ROOT: LazyLock<PathBuf> = LazyLock::new(|| {
    match std::env::var("TOOLFETCH_BUILD_DIR") {
        Ok(dir) if !dir.is_empty() => PathBuf::from(dir),
        _ => PathBuf::from("build"),
    }
});

/// Computes a path under the build root based on the arguments.
///
/// Returns a `&Path` referencing the build root itself if no arguments are
/// passed in, or a `PathBuf` created by joining all of the arguments to the
/// build root if at least one argument is passed in.
///
/// # Examples
///
/// ```
/// // Assuming `TOOLFETCH_BUILD_DIR` is not set, the build root is ./build
/// assert_eq!(toolfetch::build_path!(), std::path::Path::new("build"));
/// assert_eq!(
///     toolfetch::build_path!("renode", "tag"),
///     std::path::Path::new("build").join("renode").join("tag")
/// );
/// ```
#[macro_export]
macro_rules! build_path {
    () => {
        $crate::paths::DEFAULT_BUILD_ROOT.as_path()
    };

    ( $( $path:expr ),+ $(,)? ) => {
        [
            $crate::paths::DEFAULT_BUILD_ROOT.as_path(),
            $( std::path::Path::new(&$path) ),+
        ].into_iter().collect::<std::path::PathBuf>()
    };
}
