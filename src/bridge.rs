use anyhow::Context;
use std::fmt;
use tokio::{
    io::{self, AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader},
    net::TcpStream,
};

/// Remote TCP service to bridge stdin/stdout to.
pub struct Endpoint {
    pub host: String,
    pub port: u16,
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.host, self.port)
    }
}

/// Relays newline-delimited UTF-8 text between the process's standard
/// streams and a single TCP connection, one pump per direction.
pub struct Bridge {
    conn: TcpStream,
}

impl Bridge {
    /// Makes a single connection attempt to the endpoint. No retry: if the
    /// server is not listening, the caller reports the failure and exits.
    pub async fn connect(endpoint: &Endpoint) -> anyhow::Result<Self> {
        let conn = TcpStream::connect((endpoint.host.as_str(), endpoint.port))
            .await
            .with_context(|| format!("failed to connect to {}", endpoint))?;
        conn.set_nodelay(true)
            .context("failed to set TCP_NODELAY to true")?;

        log::debug!("connected to {}", endpoint);

        Ok(Self { conn })
    }

    /// Runs both pumps until either direction ends. The socket→stdout pump
    /// runs as a background task; the stdin→socket pump runs inline. When
    /// stdin ends first, the write half is shut down so the server sees EOF;
    /// when the server ends first, the session is over regardless of stdin,
    /// and the abandoned stdin read is reclaimed by process exit.
    pub async fn run(self) {
        let (rx, mut tx) = self.conn.into_split();

        let inbound = tokio::spawn(async move {
            let result = pump(BufReader::new(rx), io::stdout()).await;
            log::debug!("inbound pump finished: {:?}", result);
        });

        tokio::select! {
            biased;
            _ = inbound => {}
            result = pump(BufReader::new(io::stdin()), &mut tx) => {
                log::debug!("outbound pump finished: {:?}", result);
                let _ = tx.shutdown().await;
            }
        }
    }
}

/// Copies lines from `reader` to `writer` verbatim, flushing after each one,
/// until the reader hits EOF or either side fails. Invalid UTF-8 surfaces as
/// an `InvalidData` error from `read_line` and ends the pump like any other
/// I/O failure.
async fn pump<R, W>(mut reader: R, mut writer: W) -> io::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut line = String::new();
    loop {
        line.clear();
        if reader.read_line(&mut line).await? == 0 {
            return Ok(());
        }
        writer.write_all(line.as_bytes()).await?;
        writer.flush().await?;
    }
}
