//! Class name to source file resolution.

use sensor_model::{InputFileSystem, ResourceHandle};
use tracing::debug;

/// Maps a reported class name to the project resource holding its tests.
pub trait UnitTestResourceResolver {
    fn resolve(&self, class_name: &str) -> Option<ResourceHandle>;
}

impl<F> UnitTestResourceResolver for F
where
    F: Fn(&str) -> Option<ResourceHandle>,
{
    fn resolve(&self, class_name: &str) -> Option<ResourceHandle> {
        self(class_name)
    }
}

/// Resolves `a.b.FooTests` to a file `a/b/FooTests.m` anywhere in the project.
///
/// Category files are named `Foo+Bar.m` but reported as `Foo_Bar`, so the
/// `+` spelling is tried as well. Resolved files are tagged as unit test
/// files.
pub struct ClassFileResolver<'a, F: ?Sized> {
    files: &'a F,
    extension: &'a str,
}

impl<'a, F: InputFileSystem + ?Sized> ClassFileResolver<'a, F> {
    pub const DEFAULT_EXTENSION: &'static str = "m";

    pub fn new(files: &'a F) -> Self {
        Self {
            files,
            extension: Self::DEFAULT_EXTENSION,
        }
    }

    #[must_use]
    pub fn with_extension(mut self, extension: &'a str) -> Self {
        self.extension = extension;
        self
    }

    /// Glob patterns tried for `class_name`, in order.
    pub fn candidate_patterns(&self, class_name: &str) -> Vec<String> {
        let file_name = format!("{}.{}", class_name.replace('.', "/"), self.extension);
        let mut patterns = vec![format!("**/{file_name}")];
        let category = format!("**/{}", file_name.replace('_', "+"));
        if !patterns.contains(&category) {
            patterns.push(category);
        }
        patterns
    }
}

impl<F: InputFileSystem + ?Sized> UnitTestResourceResolver for ClassFileResolver<'_, F> {
    fn resolve(&self, class_name: &str) -> Option<ResourceHandle> {
        let patterns = self.candidate_patterns(class_name);
        let resolved = self.files.input_file_matching(&patterns);
        match &resolved {
            Some(handle) => debug!(class = class_name, file = %handle, "resolved test class"),
            None => debug!(class = class_name, ?patterns, "no source file for test class"),
        }
        resolved.map(ResourceHandle::into_unit_test)
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use sensor_model::ResourceKind;

    use super::*;

    struct OneFile {
        pattern: &'static str,
    }

    impl InputFileSystem for OneFile {
        fn base_dir(&self) -> &Path {
            Path::new(".")
        }

        fn has_language(&self, _language: &str) -> bool {
            true
        }

        fn input_file(&self, _relative_path: &Path) -> Option<ResourceHandle> {
            None
        }

        fn input_file_matching(&self, patterns: &[String]) -> Option<ResourceHandle> {
            patterns
                .iter()
                .any(|pattern| pattern == self.pattern)
                .then(|| ResourceHandle::file(self.pattern))
        }
    }

    #[test]
    fn dotted_names_become_paths() {
        let files = OneFile { pattern: "**/app/FooTests.m" };
        let resolver = ClassFileResolver::new(&files);
        assert_eq!(resolver.candidate_patterns("app.FooTests"), vec!["**/app/FooTests.m"]);
    }

    #[test]
    fn underscores_are_also_tried_as_category_separators() {
        let files = OneFile { pattern: "**/NSString+UtilsTests.m" };
        let resolver = ClassFileResolver::new(&files);

        assert_eq!(
            resolver.candidate_patterns("NSString_UtilsTests"),
            vec!["**/NSString_UtilsTests.m", "**/NSString+UtilsTests.m"]
        );
        let handle = resolver.resolve("NSString_UtilsTests").unwrap();
        assert_eq!(handle.kind(), ResourceKind::UnitTestFile);
    }

    #[test]
    fn unknown_classes_do_not_resolve() {
        let files = OneFile { pattern: "**/FooTests.m" };
        let resolver = ClassFileResolver::new(&files).with_extension("mm");
        assert!(resolver.resolve("FooTests").is_none());
    }

    #[test]
    fn closures_are_resolvers() {
        let resolver = |class_name: &str| Some(ResourceHandle::file(class_name));
        assert_eq!(resolver.resolve("Foo").unwrap().key(), "Foo");
    }
}
