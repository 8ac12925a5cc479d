use crate::app::{App, Command, Message};
use crate::command::{self, Input, HELP};
use crate::view;
use database::KeyValueStore;
use github_client::IssueSearch;
use issuequest_core::{CoreError, ErrorExt};
use llm_interface::GuideProvider;
use search_controller::{run_fetch, Debouncer, Effect, Event};
use std::io::Write;
use std::sync::Arc;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::sync::mpsc;
use tracing::{debug, info};

const CHANNEL_CAPACITY: usize = 64;

/// Event loop: owns the [`App`], runs its commands as tasks and feeds results back in.
pub struct Runtime<C, P, S>
where
    C: IssueSearch + 'static,
    P: GuideProvider + 'static,
    S: KeyValueStore,
{
    app: App<S>,
    client: Arc<C>,
    guide: Arc<P>,
    debouncer: Debouncer,
    tx: mpsc::Sender<Message>,
    rx: mpsc::Receiver<Message>,
}

impl<C, P, S> Runtime<C, P, S>
where
    C: IssueSearch + 'static,
    P: GuideProvider + 'static,
    S: KeyValueStore,
{
    pub fn new(app: App<S>, client: Arc<C>, guide: Arc<P>) -> Self {
        let (tx, rx) = mpsc::channel(CHANNEL_CAPACITY);
        Self {
            app,
            client,
            guide,
            debouncer: Debouncer::new(),
            tx,
            rx,
        }
    }

    pub fn app(&self) -> &App<S> {
        &self.app
    }

    pub async fn send(&mut self, message: Message) {
        let commands = self.app.update(message).await;
        for command in commands {
            self.execute(command);
        }
    }

    /// Wait for the next message produced by a background task and apply it.
    pub async fn process_next(&mut self) -> bool {
        match self.rx.recv().await {
            Some(message) => {
                self.send(message).await;
                true
            }
            None => false,
        }
    }

    /// Load the first page for the configured filters and render it once.
    pub async fn run_once<W: Write>(&mut self, output: &mut W) -> Result<(), CoreError> {
        self.send(Message::Search(Event::Refresh)).await;
        while self.app.search().is_loading() {
            if !self.process_next().await {
                break;
            }
        }
        self.render(output)
    }

    /// Read commands line by line until `quit` or end of input.
    pub async fn run_interactive<R, W>(&mut self, input: R, output: &mut W) -> Result<(), CoreError>
    where
        R: AsyncBufRead + Unpin,
        W: Write,
    {
        let mut lines = input.lines();
        self.send(Message::Search(Event::Refresh)).await;
        writeln!(output, "Type `help` for commands.")?;
        self.render(output)?;

        loop {
            tokio::select! {
                line = lines.next_line() => {
                    let Some(line) = line? else {
                        debug!("Input closed");
                        break;
                    };
                    match command::parse(&line) {
                        Ok(Input::Message(message)) => {
                            self.send(message).await;
                            self.render(output)?;
                        }
                        Ok(Input::Show) => self.render(output)?,
                        Ok(Input::Help) => writeln!(output, "{HELP}")?,
                        Ok(Input::Quit) => break,
                        Ok(Input::Empty) => {}
                        Err(e) => writeln!(output, "{}", e.user_friendly_message())?,
                    }
                }
                Some(message) = self.rx.recv() => {
                    self.send(message).await;
                    self.render(output)?;
                }
            }
        }

        self.debouncer.cancel();
        info!("Session ended");
        Ok(())
    }

    fn render<W: Write>(&mut self, output: &mut W) -> Result<(), CoreError> {
        writeln!(output, "\n{}", view::render(&self.app))?;
        output.flush()?;
        self.app.clear_toast();
        Ok(())
    }

    fn execute(&mut self, command: Command) {
        match command {
            Command::Search(Effect::Fetch {
                request_id,
                request,
            }) => {
                let client = Arc::clone(&self.client);
                let tx = self.tx.clone();
                tokio::spawn(async move {
                    let event = run_fetch(client.as_ref(), request_id, request).await;
                    if tx.send(Message::Search(event)).await.is_err() {
                        debug!("Event loop closed before request {} finished", request_id);
                    }
                });
            }
            Command::Search(Effect::ScheduleCommit { generation, delay }) => {
                let tx = self.tx.clone();
                self.debouncer.schedule(delay, async move {
                    let _ = tx
                        .send(Message::Search(Event::SearchCommitted { generation }))
                        .await;
                });
            }
            Command::FetchGuide { issue_id, request } => {
                let guide = Arc::clone(&self.guide);
                let tx = self.tx.clone();
                tokio::spawn(async move {
                    let result = guide.generate_guide(&request).await;
                    if tx
                        .send(Message::GuideLoaded { issue_id, result })
                        .await
                        .is_err()
                    {
                        debug!("Event loop closed before guide for {} finished", issue_id);
                    }
                });
            }
        }
    }
}
