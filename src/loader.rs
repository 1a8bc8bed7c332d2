//! Template resolution: mapping template identifiers to source text.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::error::{self, Error};

/// A source of template text.
///
/// Identifiers use dots or slashes as path separators (`layouts.app` and
/// `layouts/app` name the same template).
pub trait Loader {
	/// Load the source of the named template.
	fn load(&self, name: &str) -> Result<String, Error>;
}

/// A loader that resolves templates against a list of directories.
#[derive(Debug, Clone)]
pub struct FileLoader {
	paths: Vec<PathBuf>,
	extension: String,
}

impl FileLoader {
	/// Create a loader searching the given directories, in order.
	///
	/// Templates are expected to carry the `tpl` extension;
	/// use [`Self::with_extension()`] to change it.
	pub fn new(paths: impl IntoIterator<Item = impl Into<PathBuf>>) -> Self {
		Self {
			paths: paths.into_iter().map(Into::into).collect(),
			extension: "tpl".into(),
		}
	}

	/// Change the file extension appended to template identifiers.
	pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
		self.extension = extension.into();
		self
	}

	/// Turn a template identifier into a path relative to a search directory.
	fn relative_path(&self, name: &str) -> PathBuf {
		// An identifier may already carry the extension; strip it so the
		// dot-to-slash rewrite does not mangle it.
		let name = name.strip_suffix(&format!(".{}", self.extension)).unwrap_or(name);
		let mut path: String = name.replace('.', "/");
		path.push('.');
		path.push_str(&self.extension);
		PathBuf::from(path)
	}
}

impl Loader for FileLoader {
	fn load(&self, name: &str) -> Result<String, Error> {
		let relative = self.relative_path(name);
		let mut searched = Vec::with_capacity(self.paths.len());
		for dir in &self.paths {
			let path = dir.join(&relative);
			if path.is_file() {
				tracing::debug!(name, path = %path.display(), "loading template");
				return read_template(&path);
			}
			searched.push(path);
		}
		Err(error::TemplateNotFound {
			name: name.into(),
			searched,
		}
		.into())
	}
}

fn read_template(path: &Path) -> Result<String, Error> {
	std::fs::read_to_string(path).map_err(|e| {
		error::Io {
			path: path.into(),
			message: e.to_string(),
		}
		.into()
	})
}

/// A loader serving templates from an in-memory map.
///
/// Mostly useful in tests and for embedded template sets.
#[derive(Debug, Clone, Default)]
pub struct MemoryLoader {
	templates: BTreeMap<String, String>,
}

impl MemoryLoader {
	/// Create an empty loader.
	pub fn new() -> Self {
		Self::default()
	}

	/// Register a template under the given identifier.
	///
	/// Identifiers are normalized to slash form, so a template added as
	/// `layouts/app` is also found as `layouts.app`.
	pub fn add(&mut self, name: impl Into<String>, source: impl Into<String>) -> &mut Self {
		self.templates.insert(name.into().replace('.', "/"), source.into());
		self
	}
}

impl Loader for MemoryLoader {
	fn load(&self, name: &str) -> Result<String, Error> {
		let key = name.replace('.', "/");
		self.templates.get(&key).cloned().ok_or_else(|| {
			error::TemplateNotFound {
				name: name.into(),
				searched: Vec::new(),
			}
			.into()
		})
	}
}

#[cfg(test)]
mod test {
	use assert2::{check, let_assert};

	use super::*;

	#[test]
	fn test_relative_path() {
		let loader = FileLoader::new(["templates"]);
		check!(loader.relative_path("page") == PathBuf::from("page.tpl"));
		check!(loader.relative_path("layouts.app") == PathBuf::from("layouts/app.tpl"));
		check!(loader.relative_path("layouts/app") == PathBuf::from("layouts/app.tpl"));
		check!(loader.relative_path("layouts/app.tpl") == PathBuf::from("layouts/app.tpl"));
	}

	#[test]
	fn test_relative_path_custom_extension() {
		let loader = FileLoader::new(["templates"]).with_extension("html");
		check!(loader.relative_path("emails.welcome") == PathBuf::from("emails/welcome.html"));
	}

	#[test]
	fn test_file_loader_reports_searched_paths() {
		let loader = FileLoader::new(["a", "b"]);
		let_assert!(Err(Error::TemplateNotFound(e)) = loader.load("missing"));
		check!(e.name == "missing");
		check!(e.searched == vec![PathBuf::from("a/missing.tpl"), PathBuf::from("b/missing.tpl")]);
	}

	#[test]
	fn test_memory_loader() {
		let mut loader = MemoryLoader::new();
		loader.add("layouts.app", "layout");
		check!(let Ok("layout") = loader.load("layouts/app").as_deref());
		check!(let Ok("layout") = loader.load("layouts.app").as_deref());
		check!(let Err(Error::TemplateNotFound(_)) = loader.load("nope"));
	}
}
