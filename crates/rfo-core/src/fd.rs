//! The descriptor-namespace scheme shared by client and server.
//!
//! The server shifts every successful `open` result by [`FD_OFFSET`] before
//! returning it, and shifts incoming descriptors back by the same amount
//! before calling the real syscall. The client uses the same constant, via
//! its watermark, to decide whether a descriptor is local or remote. A
//! negative value (an error sentinel, never a real descriptor) passes
//! through both directions unchanged.

/// Added to a server-side descriptor before it crosses the wire, and
/// subtracted before the server uses it locally. Chosen larger than any
/// descriptor value the client's own process is expected to allocate.
pub const FD_OFFSET: i32 = 1000;

/// Translates a real server-side descriptor into its wire form.
///
/// Negative values (failure sentinels) pass through unchanged.
#[must_use]
pub fn pack_fd(fd: i32) -> i32 {
    if fd < 0 { fd } else { fd + FD_OFFSET }
}

/// Translates a wire-form descriptor back into the server's local
/// descriptor space.
///
/// Negative values pass through unchanged.
#[must_use]
pub fn unpack_fd(fd: i32) -> i32 {
    if fd < 0 { fd } else { fd - FD_OFFSET }
}

/// Reports whether `fd` lies in the remote range, i.e. is at or above
/// [`FD_OFFSET`].
///
/// This is the client-side half of the scheme: the client never compares
/// against `FD_OFFSET` directly, it compares against its own watermark (see
/// `rfo-client`'s session state), but a descriptor below `FD_OFFSET` can
/// never be remote regardless of watermark state.
#[must_use]
pub fn is_remote(fd: i32) -> bool {
    fd >= FD_OFFSET
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    proptest! {
        #[test]
        fn pack_then_unpack_is_identity_for_any_non_negative_fd(fd in 0i32..i32::MAX - FD_OFFSET) {
            prop_assert_eq!(unpack_fd(pack_fd(fd)), fd);
        }

        #[test]
        fn negative_values_pass_through_both_directions_prop(fd in i32::MIN..0) {
            prop_assert_eq!(pack_fd(fd), fd);
            prop_assert_eq!(unpack_fd(fd), fd);
        }
    }

    #[test]
    fn pack_then_unpack_is_identity() {
        for fd in [0, 1, 3, 4095] {
            assert_eq!(unpack_fd(pack_fd(fd)), fd);
        }
    }

    #[test]
    fn negative_values_pass_through_both_directions() {
        assert_eq!(pack_fd(-1), -1);
        assert_eq!(unpack_fd(-1), -1);
    }

    #[test]
    fn packed_descriptor_is_remote() {
        assert!(is_remote(pack_fd(0)));
        assert!(!is_remote(2));
    }
}
