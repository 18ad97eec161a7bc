use anyhow::{Context, Result};
use std::future::Future;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};

use super::{render, Command, HELP};
use crate::notify::NotificationSender;
use crate::session::{Delivery, SessionController, TransitionError};

/// Run the interactive surface on stdin/stdout until `quit`, end of input
/// or Ctrl-C
pub async fn run_terminal<N: NotificationSender>(controller: &SessionController<N>) -> Result<()> {
    let input = BufReader::new(tokio::io::stdin());
    let output = tokio::io::stdout();
    run_with_io(controller, input, output, interrupted()).await
}

/// Resolves on Ctrl-C; never resolves if the handler cannot be installed
async fn interrupted() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("Failed to listen for Ctrl-C: {}", e);
        std::future::pending::<()>().await;
    }
}

async fn run_with_io<N, R, W, S>(
    controller: &SessionController<N>,
    input: R,
    mut output: W,
    shutdown: S,
) -> Result<()>
where
    N: NotificationSender,
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
    S: Future<Output = ()>,
{
    let mut lines = input.lines();
    tokio::pin!(shutdown);

    write_out(&mut output, "Punch Clock Time Tracker\n").await?;
    write_out(&mut output, &format!("{}\n\n", HELP)).await?;
    show_status(controller, &mut output).await?;

    loop {
        write_out(&mut output, "> ").await?;

        // An interrupt arriving during a send is picked up here once it settles
        let line = tokio::select! {
            line = lines.next_line() => line.context("Failed to read input")?,
            _ = &mut shutdown => {
                tracing::info!("Interrupted");
                write_out(&mut output, "\nInterrupted\n").await?;
                None
            }
        };

        let Some(line) = line else {
            break;
        };

        let command = match Command::parse(&line) {
            Ok(command) => command,
            Err(message) => {
                alert(&mut output, &message).await?;
                continue;
            }
        };

        match command {
            Command::Empty => {}
            Command::Set(field, value) => {
                if let Err(e) = controller.edit(field, value).await {
                    alert(&mut output, &e.to_string()).await?;
                }
            }
            Command::Login => {
                announce_send(controller, &mut output).await?;
                report(&mut output, controller.login().await).await?;
                show_status(controller, &mut output).await?;
            }
            Command::Logout => {
                announce_send(controller, &mut output).await?;
                report(&mut output, controller.logout().await).await?;
                show_status(controller, &mut output).await?;
            }
            Command::Status => show_status(controller, &mut output).await?,
            Command::Help => write_out(&mut output, &format!("{}\n", HELP)).await?,
            Command::Quit => break,
        }
    }

    // Leaving mid-session would lose the exit notification
    if controller.snapshot().await.is_active() {
        tracing::info!("Input closed while logged in, logging out");
        write_out(&mut output, "\nLogging out before exit...\n").await?;
        report(&mut output, controller.logout().await).await?;
    }

    output.flush().await.context("Failed to flush output")?;
    Ok(())
}

async fn report<W: AsyncWrite + Unpin>(
    output: &mut W,
    result: Result<Delivery, TransitionError>,
) -> Result<()> {
    match result {
        Ok(delivery) if delivery.is_sent() => {
            write_out(output, &format!("{}\n", delivery.message())).await
        }
        Ok(delivery) => alert(output, &delivery.message()).await,
        Err(e) => alert(output, &e.to_string()).await,
    }
}

/// Show the busy label when the pressed action is going to send
async fn announce_send<N, W>(controller: &SessionController<N>, output: &mut W) -> Result<()>
where
    N: NotificationSender,
    W: AsyncWrite + Unpin,
{
    if controller.view().await.action_enabled {
        write_out(output, "Sending...\n").await?;
    }
    Ok(())
}

async fn show_status<N, W>(controller: &SessionController<N>, output: &mut W) -> Result<()>
where
    N: NotificationSender,
    W: AsyncWrite + Unpin,
{
    let session = controller.snapshot().await;
    let view = controller.view().await;
    write_out(output, &render(&session, &view)).await
}

async fn alert<W: AsyncWrite + Unpin>(output: &mut W, message: &str) -> Result<()> {
    write_out(output, &format!("! {}\n", message)).await
}

async fn write_out<W: AsyncWrite + Unpin>(output: &mut W, text: &str) -> Result<()> {
    output
        .write_all(text.as_bytes())
        .await
        .context("Failed to write output")?;
    output.flush().await.context("Failed to flush output")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notify::DryRunSender;
    use crate::session::clock::WallClock;
    use std::time::Duration;
    use tokio::time;

    fn controller() -> SessionController<DryRunSender> {
        SessionController::with_clock(DryRunSender, WallClock::default())
    }

    async fn run_script(controller: &SessionController<DryRunSender>, script: &str) -> String {
        let mut output = Vec::new();
        run_with_io(controller, script.as_bytes(), &mut output, std::future::pending())
            .await
            .unwrap();
        String::from_utf8(output).unwrap()
    }

    #[tokio::test(start_paused = true)]
    async fn full_session_through_commands() {
        let controller = controller();
        let output = run_script(
            &controller,
            "name Jane\nlocation Office\nemail jane@example.com\nlogin\nstatus\nlogout\nquit\n",
        )
        .await;

        assert!(output.contains("Log In email sent!"));
        assert!(output.contains("[ Log Out ]"));
        assert!(output.contains("Duration: 00:00:00"));
        assert!(output.contains("Log Out email sent!"));
        assert!(!controller.snapshot().await.is_active());
    }

    #[tokio::test(start_paused = true)]
    async fn validation_alerts() {
        let controller = controller();
        let output = run_script(&controller, "login\nname Jane\nlocation Office\nemail jane\nlogin\n").await;

        assert!(output.contains("! Please fill out all fields."));
        assert!(output.contains("! Please enter a valid email address."));
        assert!(!output.contains("email sent"));
        assert!(!controller.snapshot().await.is_active());
    }

    #[tokio::test(start_paused = true)]
    async fn locked_fields_and_unknown_commands_alert() {
        let controller = controller();
        let output = run_script(
            &controller,
            "name Jane\nlocation Office\nemail jane@example.com\nlogin\nname Bob\npunch\nquit\n",
        )
        .await;

        assert!(output.contains("! The name field cannot be changed while logged in"));
        assert!(output.contains("! Unknown command"));
    }

    #[tokio::test(start_paused = true)]
    async fn end_of_input_logs_out_active_session() {
        let controller = controller();
        let output = run_script(&controller, "name Jane\nlocation Office\nemail jane@example.com\nlogin\n").await;

        assert!(output.contains("Logging out before exit"));
        assert!(output.contains("Log Out email sent!"));
        assert!(!controller.snapshot().await.is_active());
    }

    #[tokio::test(start_paused = true)]
    async fn interrupt_logs_out_active_session() {
        let controller = controller();
        let (mut keyboard, input) = tokio::io::duplex(1024);
        keyboard
            .write_all(b"name Jane\nlocation Office\nemail jane@example.com\nlogin\n")
            .await
            .unwrap();

        // Input stays open; the interrupt ends the loop
        let mut output = Vec::new();
        run_with_io(
            &controller,
            BufReader::new(input),
            &mut output,
            time::sleep(Duration::from_secs(10)),
        )
        .await
        .unwrap();
        drop(keyboard);

        let output = String::from_utf8(output).unwrap();
        assert!(output.contains("Log In email sent!"));
        assert!(output.contains("Interrupted"));
        assert!(output.contains("Log Out email sent!"));
        assert!(!controller.snapshot().await.is_active());
    }
}
