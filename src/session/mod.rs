//! Interactive pick-up point session.
//!
//! A line-oriented front end over two directory workers. `read` goes to the reader,
//! `write <name>, <address>, <contact>` goes to the writer, and each command waits
//! for its worker's answer before the next line is read. `exit` (or end of input)
//! closes both workers and waits for them to finish.

use crate::clients::{DirectoryReaderClient, DirectoryWriterClient};
use crate::directory::{self, PickUpPointStore};
use crate::model::PickUpPointCreate;
use std::io;
use std::sync::Arc;
use thiserror::Error;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tokio::task::JoinHandle;
use tracing::{error, info};

pub const WRITE_SUCCESS: &str = "Pick-up point has been written successfully!";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionCommand {
    Read,
    Write(PickUpPointCreate),
    Exit,
}

/// A line the session could not turn into a command. Shown to the user verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionInputError {
    #[error("write command requires arguments")]
    MissingWriteArguments,

    #[error("expected 3 arguments for write command: Name, Address, Contact info")]
    WrongWriteArity(usize),

    #[error("unknown command. List of commands: \"read, write\"")]
    UnknownCommand(String),
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("session I/O failed: {0}")]
    Io(#[from] io::Error),

    #[error("directory worker failed: {0}")]
    Worker(#[from] tokio::task::JoinError),
}

impl SessionCommand {
    pub fn parse(line: &str) -> Result<Self, SessionInputError> {
        let line = line.trim();
        let (command, args) = match line.split_once(' ') {
            Some((command, args)) => (command, Some(args)),
            None => (line, None),
        };

        match command {
            "read" => Ok(SessionCommand::Read),
            "exit" => Ok(SessionCommand::Exit),
            "write" => {
                let args = args.ok_or(SessionInputError::MissingWriteArguments)?;
                let fields: Vec<&str> = args.split(',').map(str::trim).collect();
                match fields.as_slice() {
                    [name, address, contact] => Ok(SessionCommand::Write(PickUpPointCreate {
                        name: name.to_string(),
                        address: address.to_string(),
                        contact: contact.to_string(),
                    })),
                    _ => Err(SessionInputError::WrongWriteArity(fields.len())),
                }
            }
            other => Err(SessionInputError::UnknownCommand(other.to_string())),
        }
    }
}

/// Running reader and writer workers plus the clients that reach them.
pub struct Session {
    reader: DirectoryReaderClient,
    writer: DirectoryWriterClient,
    handles: Vec<JoinHandle<()>>,
}

impl Session {
    /// Spawns both directory workers over `store`.
    pub fn start(store: Arc<PickUpPointStore>, buffer_size: usize) -> Self {
        let ((reader_actor, reader), (writer_actor, writer)) = directory::new(store, buffer_size);
        let handles = vec![
            tokio::spawn(reader_actor.run(())),
            tokio::spawn(writer_actor.run(())),
        ];
        info!("Interactive session started");
        Self {
            reader,
            writer,
            handles,
        }
    }

    /// Processes commands from `input` until `exit` or end of input, then shuts down.
    pub async fn run<R, W>(self, input: R, mut output: W) -> Result<(), SessionError>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let mut lines = input.lines();
        while let Some(line) = lines.next_line().await? {
            let command = match SessionCommand::parse(&line) {
                Ok(command) => command,
                Err(e) => {
                    write_line(&mut output, &e.to_string()).await?;
                    continue;
                }
            };

            match command {
                SessionCommand::Read => match self.reader.read_all().await {
                    Ok(points) => {
                        for point in points {
                            write_line(&mut output, &point.to_string()).await?;
                        }
                    }
                    Err(e) => {
                        write_line(&mut output, &format!("failed to read pick-up points: {e}"))
                            .await?
                    }
                },
                SessionCommand::Write(params) => match self.writer.write(params).await {
                    Ok(_) => write_line(&mut output, WRITE_SUCCESS).await?,
                    Err(e) => {
                        write_line(&mut output, &format!("failed to get response: {e}")).await?
                    }
                },
                SessionCommand::Exit => break,
            }
        }
        output.flush().await?;
        self.shutdown().await
    }

    /// Closes both worker channels and waits for in-flight requests to finish.
    pub async fn shutdown(self) -> Result<(), SessionError> {
        drop(self.reader);
        drop(self.writer);
        for handle in self.handles {
            if let Err(e) = handle.await {
                error!("Directory worker failed: {:?}", e);
                return Err(e.into());
            }
        }
        info!("Interactive session closed");
        Ok(())
    }
}

async fn write_line<W: AsyncWrite + Unpin>(output: &mut W, line: &str) -> io::Result<()> {
    output.write_all(line.as_bytes()).await?;
    output.write_all(b"\n").await
}
