use crate::error::{Result, WmError};
use nix::sys::wait::waitpid;
use nix::unistd::{execvp, fork, setsid, ForkResult};
use std::ffi::CString;

/// Starts external programs on behalf of key bindings.
pub trait Launcher {
    fn spawn(&self, argv: &[&str]) -> Result<()>;
}

/// Double-forks so the program is reparented to init and never lingers as
/// a zombie of the window manager.
pub struct ForkLauncher;

impl Launcher for ForkLauncher {
    fn spawn(&self, argv: &[&str]) -> Result<()> {
        let Some(&program) = argv.first() else {
            return Ok(());
        };
        let spawn_err = |source| WmError::Spawn {
            program: program.to_string(),
            source,
        };

        // Allocate before forking; the children must not touch the heap.
        let args = argv
            .iter()
            .map(|arg| CString::new(*arg))
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|_| spawn_err(nix::Error::EINVAL))?;

        // SAFETY: the process is single threaded, and the children only call
        // setsid, fork, execvp and _exit before replacing themselves.
        match unsafe { fork() }.map_err(spawn_err)? {
            ForkResult::Parent { child } => {
                waitpid(child, None).map_err(spawn_err)?;
                log::info!("spawned {}", program);
                Ok(())
            }
            ForkResult::Child => {
                let _ = setsid();
                // SAFETY: see above.
                if let Ok(ForkResult::Child) = unsafe { fork() } {
                    let _ = execvp(&args[0], &args);
                }
                // SAFETY: _exit skips destructors and atexit hooks that
                // belong to the parent.
                unsafe { nix::libc::_exit(0) }
            }
        }
    }
}
