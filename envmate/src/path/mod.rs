//! Key-path composition for traversals over nested values.
//!
//! A [`KeyPath`] is a stack of [`Segment`]s rendered as an underscore-joined
//! flat key. Walkers push a segment when they descend into a member or
//! element and pop it when they leave; [`PathScope`] ties the pop to a guard
//! so it runs on every exit path, including early returns through `?`.

use std::fmt;
use std::ops::{Deref, DerefMut};

/// One unit of a key path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// An upper-cased member name.
    Name(String),
    /// A sequence index.
    Index(usize),
}

impl Segment {
    /// Creates a name segment, upper-casing `name`.
    #[must_use]
    pub fn name(name: &str) -> Self {
        Self::Name(name.to_ascii_uppercase())
    }

    /// Creates an index segment.
    #[must_use]
    pub const fn index(index: usize) -> Self {
        Self::Index(index)
    }
}

impl From<&str> for Segment {
    fn from(name: &str) -> Self {
        Self::name(name)
    }
}

impl From<usize> for Segment {
    fn from(index: usize) -> Self {
        Self::Index(index)
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Name(name) => f.write_str(name),
            Self::Index(index) => write!(f, "{index}"),
        }
    }
}

/// Stack of segments describing the current traversal position.
///
/// # Examples
///
/// ```
/// use envmate::KeyPath;
///
/// let mut path = KeyPath::default();
/// path.enter("items");
/// path.enter(0);
/// path.enter("name");
/// assert_eq!(path.render(), "ITEMS_0_NAME");
/// assert_eq!(path.render_prefix(2), "ITEMS_0");
/// path.exit();
/// assert_eq!(path.render(), "ITEMS_0");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeyPath {
    segments: Vec<Segment>,
}

impl KeyPath {
    /// Creates an empty path.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            segments: Vec::new(),
        }
    }

    /// Pushes `segment`.
    pub fn enter(&mut self, segment: impl Into<Segment>) {
        self.segments.push(segment.into());
    }

    /// Pops the innermost segment. Popping an empty path does nothing.
    pub fn exit(&mut self) {
        self.segments.pop();
    }

    /// Number of segments currently pushed.
    #[must_use]
    pub const fn depth(&self) -> usize {
        self.segments.len()
    }

    /// Segments in stack order.
    #[must_use]
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Renders every segment joined with `_`.
    #[must_use]
    pub fn render(&self) -> String {
        self.render_prefix(self.segments.len())
    }

    /// Renders the first `n` segments joined with `_`.
    #[must_use]
    pub fn render_prefix(&self, n: usize) -> String {
        let mut out = String::new();
        for (position, segment) in self.segments.iter().take(n).enumerate() {
            if position > 0 {
                out.push('_');
            }
            match segment {
                Segment::Name(name) => out.push_str(name),
                Segment::Index(index) => out.push_str(&index.to_string()),
            }
        }
        out
    }
}

impl fmt::Display for KeyPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

/// Anything that owns a [`KeyPath`] and can hand out scoped segments.
pub trait Walker {
    /// Mutable access to the walker's path.
    fn path_mut(&mut self) -> &mut KeyPath;
}

impl Walker for KeyPath {
    fn path_mut(&mut self) -> &mut KeyPath {
        self
    }
}

/// Guard holding one pushed segment; dropping it pops the segment.
///
/// The guard dereferences to the walker, so nested traversal code receives
/// `&mut scope` wherever it expects the walker itself.
///
/// # Examples
///
/// ```
/// use envmate::{KeyPath, PathScope, Segment};
///
/// let mut path = KeyPath::default();
/// {
///     let mut outer = PathScope::new(&mut path, Segment::name("key"));
///     let inner = PathScope::new(&mut *outer, Segment::index(1));
///     assert_eq!(inner.render(), "KEY_1");
/// }
/// assert_eq!(path.depth(), 0);
/// ```
#[must_use = "dropping the scope immediately leaves the segment"]
pub struct PathScope<'a, W: Walker + ?Sized> {
    walker: &'a mut W,
}

impl<'a, W: Walker + ?Sized> PathScope<'a, W> {
    /// Pushes `segment` onto `walker`'s path for the lifetime of the guard.
    pub fn new(walker: &'a mut W, segment: Segment) -> Self {
        walker.path_mut().enter(segment);
        Self { walker }
    }
}

impl<W: Walker + ?Sized> Deref for PathScope<'_, W> {
    type Target = W;

    fn deref(&self) -> &W {
        self.walker
    }
}

impl<W: Walker + ?Sized> DerefMut for PathScope<'_, W> {
    fn deref_mut(&mut self) -> &mut W {
        self.walker
    }
}

impl<W: Walker + ?Sized> Drop for PathScope<'_, W> {
    fn drop(&mut self) {
        self.walker.path_mut().exit();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn enter_and_exit_follow_stack_order() {
        let mut path = KeyPath::default();
        assert_eq!(path.render(), "");

        path.enter("key");
        assert_eq!(path.render(), "KEY");
        path.enter(1);
        assert_eq!(path.render(), "KEY_1");
        path.enter("prop");
        assert_eq!(path.render(), "KEY_1_PROP");

        path.exit();
        assert_eq!(path.render(), "KEY_1");
        path.exit();
        assert_eq!(path.render(), "KEY");
        path.exit();
        assert_eq!(path.render(), "");
    }

    #[test]
    fn exit_on_empty_path_is_harmless() {
        let mut path = KeyPath::default();
        path.exit();
        assert_eq!(path.depth(), 0);
    }

    #[test]
    fn render_prefix_clamps_to_depth() {
        let mut path = KeyPath::default();
        path.enter("a");
        path.enter(7);
        assert_eq!(path.render_prefix(0), "");
        assert_eq!(path.render_prefix(1), "A");
        assert_eq!(path.render_prefix(9), "A_7");
    }

    fn failing_step(path: &mut KeyPath) -> Result<(), &'static str> {
        let scope = PathScope::new(path, Segment::name("child"));
        if scope.depth() == 2 {
            return Err("boom");
        }
        Ok(())
    }

    #[test]
    fn scope_pops_on_early_return() {
        let mut path = KeyPath::default();
        path.enter("parent");
        assert_eq!(failing_step(&mut path), Err("boom"));
        assert_eq!(path.render(), "PARENT");
    }

    #[test]
    fn segments_display_like_rendered_keys() {
        assert_eq!(Segment::name("port").to_string(), "PORT");
        assert_eq!(Segment::index(3).to_string(), "3");
        let mut path = KeyPath::default();
        path.enter("servers");
        path.enter(0);
        assert_eq!(path.to_string(), "SERVERS_0");
    }
}
