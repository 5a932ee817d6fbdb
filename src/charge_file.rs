//! Reading and writing `card;amount` charge files.

use std::{
    fs,
    io::{self, BufWriter, Write},
    path::Path,
};

use bytes::{Bytes, BytesMut};
use log::debug;
use tokio::fs::File;
use tokio_stream::StreamExt;
use tokio_util::codec::{Decoder, FramedRead};

use crate::{
    charge::Charge,
    error::ChargeFileError,
    parser::{format_line, parser},
};

// Tokio MAX_BUF for blocking IO: https://github.com/tokio-rs/tokio/blob/master/tokio/src/io/blocking.rs#L26
const BUFFER_SIZE: usize = 2 * 1024 * 1024;

/// Cuts the read buffer after its last newline so every chunk holds whole lines.
struct ChunkDecoder;

impl Decoder for ChunkDecoder {
    type Item = Bytes;
    type Error = io::Error;

    #[inline]
    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        match memchr::memrchr(b'\n', src) {
            Some(index) => Ok(Some(src.split_to(index + 1).freeze())),
            None => Ok(None),
        }
    }

    fn decode_eof(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        match self.decode(src)? {
            Some(chunk) => Ok(Some(chunk)),
            None if src.is_empty() => Ok(None),
            None => Ok(Some(src.split().freeze())),
        }
    }
}

async fn read_chunks(path: &Path, capacity: usize) -> Result<Vec<Charge>, ChargeFileError> {
    let file = File::open(path).await?;
    let mut framed = FramedRead::with_capacity(file, ChunkDecoder, capacity);
    let mut tasks = Vec::new();
    while let Some(chunk) = framed.next().await {
        let chunk = chunk?;
        tasks.push(tokio::task::spawn_blocking(move || parser(&chunk)));
    }
    debug!("parsing {} chunks from {}", tasks.len(), path.display());

    let mut charges = Vec::new();
    for task in tasks {
        charges.extend(task.await??);
    }
    Ok(charges)
}

/// Reads every charge in `path`, in file order. Chunks are parsed on
/// blocking tasks while the file is still being read.
#[tokio::main]
pub async fn read_charges(path: &Path) -> Result<Vec<Charge>, ChargeFileError> {
    read_chunks(path, BUFFER_SIZE).await
}

pub fn write_charges(path: &Path, charges: &[Charge]) -> io::Result<()> {
    let mut writer = BufWriter::new(fs::File::create(path)?);
    for charge in charges {
        writer.write_all(format_line(charge).as_bytes())?;
    }
    writer.flush()
}
