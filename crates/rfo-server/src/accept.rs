//! Accept loop: binds, listens, and forks a child per connection.

use std::io;
use std::net::TcpListener;
use std::os::unix::io::AsRawFd;

use crate::connection;

/// Binds on `port` (all interfaces), listens, and accepts connections
/// forever, forking a fresh child per connection.
///
/// The parent closes its copy of the accepted socket and resumes accepting;
/// the child closes its copy of the listening socket and enters
/// [`connection::serve`], exiting once that returns. Matches `server.c`'s
/// `main` loop, down to the order of operations around `fork(2)`.
///
/// # Errors
/// Returns the underlying [`io::Error`] on bind, listen, or accept failure.
pub fn run(port: u16) -> io::Result<()> {
    let listener = TcpListener::bind(("0.0.0.0", port))?;
    tracing::info!(target: "rfo", port, "server started");

    loop {
        tracing::debug!(target: "rfo", "listening...");
        let (stream, peer) = listener.accept()?;
        tracing::info!(target: "rfo", %peer, "new connection");

        // SAFETY: fork() duplicates the process; the parent and child
        // branches below only touch state valid in their own copy.
        match unsafe { libc::fork() } {
            -1 => return Err(io::Error::last_os_error()),
            0 => {
                tracing::debug!(target: "rfo", "fork child - handling request");
                // SAFETY: closing this process's copy of the listening
                // socket's descriptor does not affect the parent's, which
                // refers to a distinct file-descriptor-table entry for the
                // same underlying open file description.
                unsafe {
                    libc::close(listener.as_raw_fd());
                }
                connection::serve(stream);
                tracing::debug!(target: "rfo", "request end");
                std::process::exit(0);
            },
            _pid => drop(stream),
        }
    }
}
