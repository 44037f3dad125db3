use std::{
    fs,
    io::{self, Write},
    path::Path,
    sync::mpsc,
    thread,
};

pub use data::log::Error;

const MAX_LOG_FILE_SIZE: u64 = 50 * 1024 * 1024; // 50 MB

/// Routes `log` records for this app and the `data` crate.
///
/// Debug builds print to stdout, release builds append to a rotated file in
/// the data directory through a background writer.
pub fn setup(is_debug: bool) -> Result<(), Error> {
    let level_filter = std::env::var("RUST_LOG")
        .ok()
        .as_deref()
        .map(str::parse::<log::Level>)
        .transpose()?
        .unwrap_or(log::Level::Debug)
        .to_level_filter();

    let mut io_sink = fern::Dispatch::new().format(|out, message, record| {
        out.finish(format_args!(
            "{}:{} -- {}",
            chrono::Local::now().format("%H:%M:%S%.3f"),
            record.level(),
            message
        ));
    });

    if is_debug {
        io_sink = io_sink.chain(io::stdout());
    } else {
        let log_path = data::log::path()?;
        data::log::rotate(&log_path)?;

        let writer: Box<dyn Write + Send> = Box::new(FileWriter::spawn(&log_path)?);
        io_sink = io_sink.chain(writer);
    }

    fern::Dispatch::new()
        .level(log::LevelFilter::Off)
        .level_for("panic", log::LevelFilter::Error)
        .level_for("iced_wgpu", log::LevelFilter::Info)
        .level_for("data", level_filter)
        .level_for("candleview", level_filter)
        .chain(io_sink)
        .apply()?;

    Ok(())
}

/// Hands formatted records to a thread that owns the log file.
///
/// Dropping the writer closes the channel, which ends the thread.
struct FileWriter {
    sender: mpsc::Sender<Vec<u8>>,
}

impl FileWriter {
    fn spawn(path: &Path) -> io::Result<Self> {
        let mut file = CappedFile::open(path)?;
        let (sender, receiver) = mpsc::channel::<Vec<u8>>();

        thread::Builder::new()
            .name("log-writer".to_string())
            .spawn(move || {
                for record in receiver {
                    if let Err(err) = file.write_all(&record).and_then(|()| file.flush()) {
                        eprintln!("log write failed: {err}");
                    }
                }
            })?;

        Ok(Self { sender })
    }
}

impl Write for FileWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.sender
            .send(buf.to_vec())
            .map_err(|_| io::Error::new(io::ErrorKind::BrokenPipe, "log writer stopped"))?;

        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Log file that stops growing once it reaches [`MAX_LOG_FILE_SIZE`].
struct CappedFile {
    file: fs::File,
    size: u64,
    full: bool,
}

impl CappedFile {
    fn open(path: &Path) -> io::Result<Self> {
        let file = fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)?;

        let size = file.metadata()?.len();

        Ok(Self {
            file,
            size,
            full: false,
        })
    }
}

impl Write for CappedFile {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if self.full {
            return Ok(buf.len());
        }

        if self.size + buf.len() as u64 > MAX_LOG_FILE_SIZE {
            self.full = true;

            let notice = format!(
                "{}:ERROR -- log file reached {MAX_LOG_FILE_SIZE} bytes, further records dropped\n",
                chrono::Local::now().format("%H:%M:%S%.3f"),
            );
            eprint!("{notice}");
            self.file.write_all(notice.as_bytes())?;

            return Ok(buf.len());
        }

        let written = self.file.write(buf)?;
        self.size += written as u64;

        Ok(written)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.file.flush()
    }
}
