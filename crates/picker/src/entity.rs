/// A single search result returned by a [`DirectoryService`].
///
/// Entities are immutable snapshots; the controller never mutates them.
///
/// [`DirectoryService`]: crate::DirectoryService
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Entity {
	/// Human readable name shown in the result list.
	pub display_name: String,
	/// Key used to resolve the entity's asset, if it has one.
	pub lookup_key: Option<String>,
	/// Country the entity belongs to, when the directory reports it.
	pub country: Option<String>,
}

impl Entity {
	/// Creates an entity with a display name and optional lookup key.
	///
	/// An empty lookup key is treated as absent.
	pub fn new(display_name: impl Into<String>, lookup_key: Option<String>) -> Self {
		Self {
			display_name: display_name.into(),
			lookup_key: lookup_key.filter(|key| !key.trim().is_empty()),
			country: None,
		}
	}

	/// Sets the country.
	pub fn with_country(mut self, country: impl Into<String>) -> Self {
		self.country = Some(country.into());
		self
	}

	/// Returns the lookup key, if any.
	pub fn lookup_key(&self) -> Option<&str> {
		self.lookup_key.as_deref()
	}
}

/// Outcome of a successful asset lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssetRef {
	/// The asset exists at this locator.
	Resolved(String),
	/// The lookup succeeded but no asset exists for the key.
	Absent,
}

impl AssetRef {
	/// Returns the locator for a resolved asset.
	pub fn locator(&self) -> Option<&str> {
		match self {
			Self::Resolved(locator) => Some(locator),
			Self::Absent => None,
		}
	}

	/// Returns true if the lookup found no asset.
	pub const fn is_absent(&self) -> bool {
		matches!(self, Self::Absent)
	}
}
