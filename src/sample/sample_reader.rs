use std::path::Path;
use std::io;

use super::sample_struct::Sample;


/// A builder that returns [`Sample`].
/// Using this struct, one can read a CSV format file into [`Sample`].
/// # Example
/// The following code is a simple example to read a CSV file.
/// ```no_run
/// use minilearn::SampleReader;
///
/// let filename = "/path/to/csv/file.csv";
/// let sample = SampleReader::new()
///     .file(filename)
///     .has_header(true)
///     .target_feature("class")
///     .read()
///     .unwrap();
/// ```
pub struct SampleReader<P, S> {
    file: Option<P>,
    has_header: bool,
    target: Option<S>,
}


impl<P, S> SampleReader<P, S> {
    /// Construct a new instance of [`SampleReader`].
    pub fn new() -> Self {
        Self {
            file: None,
            has_header: false,
            target: None,
        }
    }


    /// Set the flag whether the file has the header row or not.
    /// Default is `false`.
    pub fn has_header(mut self, flag: bool) -> Self {
        self.has_header = flag;
        self
    }
}


impl<P, S> Default for SampleReader<P, S> {
    fn default() -> Self {
        Self::new()
    }
}


impl<P, S> SampleReader<P, S>
    where P: AsRef<Path>,
{
    /// Set the file name.
    pub fn file(mut self, file: P) -> Self {
        self.file = Some(file);
        self
    }
}


impl<P, S> SampleReader<P, S>
    where S: AsRef<str>,
{
    /// Set the feature name used as the prediction target.
    pub fn target_feature(mut self, target: S) -> Self {
        self.target = Some(target);
        self
    }
}


impl<P, S> SampleReader<P, S>
    where P: AsRef<Path>,
          S: AsRef<str>,
{
    /// Read the file set by [`SampleReader::file`].
    pub fn read(self) -> io::Result<Sample> {
        let file = self.file.ok_or_else(|| io::Error::new(
            io::ErrorKind::NotFound, "No file is specified",
        ))?;

        let sample = Sample::from_csv(file, self.has_header)?;
        let sample = match self.target {
            Some(target) => sample.set_target(target),
            None => sample,
        };
        Ok(sample)
    }
}
