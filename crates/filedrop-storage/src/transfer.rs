use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

use crate::StorageError;

const COPY_BUFFER_SIZE: usize = 64 * 1024;

/// Which side of a copy failed.
#[derive(Debug)]
pub(crate) enum CopyError {
    Read(std::io::Error),
    Write(std::io::Error),
}

impl CopyError {
    pub(crate) fn into_storage_error(self, key: &str) -> StorageError {
        match self {
            CopyError::Read(err) => StorageError::SourceRead(err),
            CopyError::Write(err) => {
                StorageError::UploadFailed(format!("Failed to write {}: {}", key, err))
            }
        }
    }
}

/// Copy `reader` into `writer` chunk by chunk without buffering the whole
/// stream. The writer is not flushed or shut down.
pub(crate) async fn copy_stream<W>(
    reader: &mut (dyn AsyncRead + Send + Unpin),
    writer: &mut W,
) -> Result<u64, CopyError>
where
    W: AsyncWrite + Unpin + Send + ?Sized,
{
    let mut buf = vec![0u8; COPY_BUFFER_SIZE];
    let mut total = 0u64;

    loop {
        let bytes_read = reader.read(&mut buf).await.map_err(CopyError::Read)?;
        if bytes_read == 0 {
            break;
        }
        writer
            .write_all(&buf[..bytes_read])
            .await
            .map_err(CopyError::Write)?;
        total += bytes_read as u64;
    }

    Ok(total)
}
