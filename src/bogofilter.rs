use crate::classify::Status;
use crate::error::{Error, Result};
use crate::reconcile::Correction;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus, Stdio};

/// The external classifier, reduced to the two things we ask of it.
pub trait Classifier {
    /// Reports the classifier's current belief without training it.
    fn inspect(&self, path: &Path) -> Result<Status>;
    /// Trains the classifier with a single corrective command.
    fn correct(&self, correction: Correction, path: &Path) -> Result<()>;
}

pub struct Bogofilter {
    program: PathBuf,
    database_dir: Option<PathBuf>,
}

impl Bogofilter {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Bogofilter {
            program: program.into(),
            database_dir: None,
        }
    }

    pub fn with_database_dir(mut self, dir: Option<PathBuf>) -> Self {
        self.database_dir = dir;
        self
    }

    fn run(&self, flag: Option<&str>, path: &Path) -> std::io::Result<ExitStatus> {
        let mut args: Vec<OsString> = vec![];
        if let Some(dir) = &self.database_dir {
            args.push("-d".into());
            args.push(dir.into());
        }
        if let Some(flag) = flag {
            args.push(flag.into());
        }
        args.push("-I".into());
        args.push(path.into());
        tracing::trace!("running {:?} {:?}", self.program, args);
        Command::new(&self.program)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .status()
    }
}

/// Translates the exit code of an inspection run.
pub fn status_from_exit_code(code: i32) -> Option<Status> {
    match code {
        0 => Some(Status::Spam),
        1 => Some(Status::Ham),
        2 => Some(Status::Unsure),
        _ => None,
    }
}

impl Classifier for Bogofilter {
    fn inspect(&self, path: &Path) -> Result<Status> {
        let unavailable = |reason: String| Error::ClassifierUnavailable {
            path: path.to_path_buf(),
            reason,
        };
        let status = self.run(None, path).map_err(|e| unavailable(e.to_string()))?;
        match status.code() {
            Some(code) => status_from_exit_code(code)
                .ok_or_else(|| unavailable(format!("exited with code {}", code))),
            None => Err(unavailable("terminated by signal".to_string())),
        }
    }

    fn correct(&self, correction: Correction, path: &Path) -> Result<()> {
        let failed = |reason: String| Error::ClassifierFailed {
            path: path.to_path_buf(),
            correction,
            reason,
        };
        let status = self
            .run(Some(correction.flag()), path)
            .map_err(|e| failed(e.to_string()))?;
        if status.success() {
            Ok(())
        } else {
            Err(failed(status.to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_from_exit_code() {
        assert_eq!(status_from_exit_code(0), Some(Status::Spam));
        assert_eq!(status_from_exit_code(1), Some(Status::Ham));
        assert_eq!(status_from_exit_code(2), Some(Status::Unsure));
        assert_eq!(status_from_exit_code(3), None);
        assert_eq!(status_from_exit_code(-1), None);
    }

    #[cfg(unix)]
    mod process {
        use super::*;
        use std::fs;
        use std::os::unix::fs::PermissionsExt;
        use tempfile::TempDir;

        // Logs its arguments. The first line of a message is the exit code
        // of inspecting it, the second line that of training with it.
        const FAKE_BOGOFILTER: &str = "#!/bin/sh
echo \"$*\" >> \"$(dirname \"$0\")/calls\"
for last; do :; done
if [ \"$1\" = \"-I\" ] || [ \"$3\" = \"-I\" ]; then exit \"$(sed -n 1p \"$last\")\"; fi
exit \"$(sed -n 2p \"$last\")\"
";

        struct Fixture {
            dir: TempDir,
            bogofilter: Bogofilter,
        }

        impl Fixture {
            fn new() -> Self {
                let dir = TempDir::new().unwrap();
                let program = dir.path().join("bogofilter");
                fs::write(&program, FAKE_BOGOFILTER).unwrap();
                let mut perms = fs::metadata(&program).unwrap().permissions();
                perms.set_mode(0o755);
                fs::set_permissions(&program, perms).unwrap();
                Fixture {
                    bogofilter: Bogofilter::new(program),
                    dir,
                }
            }

            fn message(&self, name: &str, inspect: i32, train: i32) -> PathBuf {
                let path = self.dir.path().join(name);
                fs::write(&path, format!("{}\n{}\nSubject: test\n", inspect, train)).unwrap();
                path
            }

            fn calls(&self) -> Vec<String> {
                fs::read_to_string(self.dir.path().join("calls"))
                    .unwrap_or_default()
                    .lines()
                    .map(|line| line.to_string())
                    .collect()
            }
        }

        #[test]
        fn test_inspect() {
            let fixture = Fixture::new();
            for &(code, expected) in &[(0, Status::Spam), (1, Status::Ham), (2, Status::Unsure)] {
                let path = fixture.message(&format!("msg{}", code), code, 0);
                assert_eq!(fixture.bogofilter.inspect(&path).unwrap(), expected);
            }
            let path = fixture.dir.path().join("msg0");
            assert_eq!(fixture.calls()[0], format!("-I {}", path.display()));
        }

        #[test]
        fn test_inspect_error() {
            let fixture = Fixture::new();
            let path = fixture.message("broken", 3, 0);
            match fixture.bogofilter.inspect(&path) {
                Err(Error::ClassifierUnavailable { path: p, .. }) => assert_eq!(p, path),
                other => panic!("unexpected result {:?}", other),
            }
        }

        #[test]
        fn test_missing_program() {
            let dir = TempDir::new().unwrap();
            let bogofilter = Bogofilter::new(dir.path().join("nonexistent"));
            let path = dir.path().join("msg");
            assert!(matches!(
                bogofilter.inspect(&path),
                Err(Error::ClassifierUnavailable { .. })
            ));
            assert!(matches!(
                bogofilter.correct(Correction::MarkSpam, &path),
                Err(Error::ClassifierFailed { .. })
            ));
        }

        #[test]
        fn test_correct() {
            let fixture = Fixture::new();
            let path = fixture.message("msg", 0, 0);
            fixture
                .bogofilter
                .correct(Correction::RetractSpamMarkHam, &path)
                .unwrap();
            assert_eq!(fixture.calls(), vec![format!("-Sn -I {}", path.display())]);
        }

        #[test]
        fn test_correct_error() {
            let fixture = Fixture::new();
            let path = fixture.message("msg", 2, 3);
            match fixture.bogofilter.correct(Correction::MarkHam, &path) {
                Err(Error::ClassifierFailed { correction, .. }) => {
                    assert_eq!(correction, Correction::MarkHam)
                }
                other => panic!("unexpected result {:?}", other),
            }
        }

        #[test]
        fn test_database_dir() {
            let fixture = Fixture::new();
            let bogofilter = Bogofilter::new(fixture.dir.path().join("bogofilter"))
                .with_database_dir(Some(PathBuf::from("/var/db")));
            let path = fixture.message("msg", 1, 0);
            assert_eq!(bogofilter.inspect(&path).unwrap(), Status::Ham);
            bogofilter.correct(Correction::MarkSpam, &path).unwrap();
            assert_eq!(
                fixture.calls(),
                vec![
                    format!("-d /var/db -I {}", path.display()),
                    format!("-d /var/db -s -I {}", path.display()),
                ]
            );
        }
    }
}
