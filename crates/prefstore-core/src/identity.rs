//! Calling identity elevation around store calls.
//!
//! A store serving its own app-private data must not be gated by the identity
//! of whoever asked. The identity is cleared for the duration of one call and
//! restored on every exit path, including unwinding.

use std::cell::Cell;
use std::fmt::Debug;

/// Opaque value handed back by [`CallingIdentity::clear`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IdentityToken(pub u64);

pub trait CallingIdentity: Debug + Send + Sync {
	/// Reset the caller identity to our own, returning the previous one
	fn clear(&self) -> IdentityToken;

	fn restore(&self, token: IdentityToken);
}

/// No caller tracking, every call already runs as ourselves
#[derive(Debug, Default, Clone, Copy)]
pub struct NoIdentity;

impl CallingIdentity for NoIdentity {
	fn clear(&self) -> IdentityToken {
		IdentityToken(0)
	}

	fn restore(&self, _token: IdentityToken) {}
}

thread_local! {
	static CALLER_UID: Cell<Option<u64>> = const { Cell::new(None) };
}

/// Per-thread caller uid, set by whatever dispatches an incoming request
#[derive(Debug, Clone, Copy)]
pub struct ThreadIdentity {
	own_uid: u64,
}

impl ThreadIdentity {
	pub fn new(own_uid: u64) -> Self {
		Self { own_uid }
	}

	/// Uid the current thread acts as
	pub fn current(&self) -> u64 {
		CALLER_UID.with(|c| c.get()).unwrap_or(self.own_uid)
	}

	/// Mark the current thread as serving `uid`
	pub fn set_caller(&self, uid: u64) {
		CALLER_UID.with(|c| c.set(Some(uid)));
	}
}

impl CallingIdentity for ThreadIdentity {
	fn clear(&self) -> IdentityToken {
		let previous = self.current();
		CALLER_UID.with(|c| c.set(Some(self.own_uid)));
		IdentityToken(previous)
	}

	fn restore(&self, token: IdentityToken) {
		CALLER_UID.with(|c| c.set(Some(token.0)));
	}
}

/// Restores the calling identity when dropped
#[must_use = "the identity is restored as soon as the guard is dropped"]
pub struct IdentityGuard<'a> {
	identity: &'a dyn CallingIdentity,
	token: IdentityToken,
}

impl<'a> IdentityGuard<'a> {
	pub fn clear(identity: &'a dyn CallingIdentity) -> Self {
		let token = identity.clear();
		Self { identity, token }
	}
}

impl Drop for IdentityGuard<'_> {
	fn drop(&mut self) {
		self.identity.restore(self.token);
	}
}

/// Run `f` with the calling identity cleared
pub fn without_calling_identity<T>(identity: &dyn CallingIdentity, f: impl FnOnce() -> T) -> T {
	let _guard = IdentityGuard::clear(identity);
	f()
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
	use super::*;
	use crate::prelude::*;

	#[test]
	fn test_identity_cleared_and_restored() {
		let identity = ThreadIdentity::new(1000);
		identity.set_caller(10_123);

		let inside = without_calling_identity(&identity, || identity.current());
		assert_eq!(inside, 1000);
		assert_eq!(identity.current(), 10_123);
	}

	#[test]
	fn test_identity_restored_on_error() {
		let identity = ThreadIdentity::new(1000);
		identity.set_caller(10_200);

		let res: PsResult<()> = without_calling_identity(&identity, || {
			Err(Error::Internal("store failed".into()))
		});
		assert!(res.is_err());
		assert_eq!(identity.current(), 10_200);
	}

	#[test]
	fn test_identity_restored_on_panic() {
		let identity = ThreadIdentity::new(1000);
		identity.set_caller(10_300);

		let res = std::panic::catch_unwind(|| {
			without_calling_identity(&identity, || -> u64 { panic!("store panicked") })
		});
		assert!(res.is_err());
		assert_eq!(identity.current(), 10_300);
	}

	#[test]
	fn test_nested_elevation() {
		let identity = ThreadIdentity::new(1);
		identity.set_caller(7);

		without_calling_identity(&identity, || {
			identity.set_caller(8);
			without_calling_identity(&identity, || assert_eq!(identity.current(), 1));
			assert_eq!(identity.current(), 8);
		});
		assert_eq!(identity.current(), 7);
	}
}

// vim: ts=4
