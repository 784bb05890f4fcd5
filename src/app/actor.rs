//! App actor - message loop processing UI events and network responses

use tokio::sync::mpsc;

use crate::app::state::AppState;
use crate::messages::{NetworkCommand, NetworkResponse, RenderState, UiEvent};

/// App actor that processes UI events and network responses
pub struct AppActor {
    state: AppState,
    network_tx: mpsc::UnboundedSender<NetworkCommand>,
    render_tx: mpsc::UnboundedSender<RenderState>,
}

impl AppActor {
    pub fn new(
        state: AppState,
        network_tx: mpsc::UnboundedSender<NetworkCommand>,
        render_tx: mpsc::UnboundedSender<RenderState>,
    ) -> Self {
        AppActor {
            state,
            network_tx,
            render_tx,
        }
    }

    /// Run the actor message loop
    pub async fn run(
        mut self,
        mut ui_rx: mpsc::UnboundedReceiver<UiEvent>,
        mut net_rx: mpsc::UnboundedReceiver<NetworkResponse>,
    ) {
        // Initial fetch of the list
        let load = self.state.load_questions();
        self.dispatch(load);
        let _ = self.render_tx.send(self.state.to_render_state());

        loop {
            tokio::select! {
                Some(event) = ui_rx.recv() => {
                    if self.handle_ui_event(event) {
                        // Quit signal received
                        let _ = self.network_tx.send(NetworkCommand::Shutdown);
                        break;
                    }
                    let _ = self.render_tx.send(self.state.to_render_state());
                }
                Some(response) = net_rx.recv() => {
                    tracing::debug!(id = response.id(), "Network response received");
                    for cmd in self.state.handle_response(response) {
                        self.dispatch(cmd);
                    }
                    let _ = self.render_tx.send(self.state.to_render_state());
                }
                else => break,
            }
        }
    }

    fn dispatch(&self, cmd: NetworkCommand) {
        if self.network_tx.send(cmd).is_err() {
            tracing::warn!("Network actor is gone; dropping command");
        }
    }

    /// Handle a UI event, returns true if quit was requested
    fn handle_ui_event(&mut self, event: UiEvent) -> bool {
        match event {
            UiEvent::SwitchView(view) => {
                for cmd in self.state.switch_view(view) {
                    self.dispatch(cmd);
                }
            }

            // List
            UiEvent::NextQuestion => self.state.next_question(),
            UiEvent::PrevQuestion => self.state.prev_question(),
            UiEvent::DeleteSelected => {
                if let Some(cmd) = self.state.delete_selected() {
                    self.dispatch(cmd);
                }
            }
            UiEvent::Reload => {
                let cmd = self.state.load_questions();
                self.dispatch(cmd);
            }

            // Selector
            UiEvent::NextCorrectAnswer => {
                if let Some(cmd) = self.state.step_correct_answer(true) {
                    self.dispatch(cmd);
                }
            }
            UiEvent::PrevCorrectAnswer => {
                if let Some(cmd) = self.state.step_correct_answer(false) {
                    self.dispatch(cmd);
                }
            }

            // Form
            UiEvent::NextField => self.state.next_field(),
            UiEvent::PrevField => self.state.prev_field(),
            UiEvent::StartEditing => self.state.start_editing(),
            UiEvent::StopEditing => self.state.stop_editing(),
            UiEvent::CharInput(c) => self.state.enter_char(c),
            UiEvent::Backspace => self.state.delete_char(),
            UiEvent::CursorLeft => self.state.move_cursor_left(),
            UiEvent::CursorRight => self.state.move_cursor_right(),
            UiEvent::SubmitForm => {
                if let Some(cmd) = self.state.submit_form() {
                    self.dispatch(cmd);
                }
            }

            // Popups
            UiEvent::ToggleHelp => self.state.toggle_help(),
            UiEvent::CloseHelp => self.state.close_help(),

            // System
            UiEvent::Quit => return true,
        }

        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::view::View;
    use crate::models::{Question, QuestionId};

    struct Harness {
        ui_tx: mpsc::UnboundedSender<UiEvent>,
        resp_tx: mpsc::UnboundedSender<NetworkResponse>,
        cmd_rx: mpsc::UnboundedReceiver<NetworkCommand>,
        render_rx: mpsc::UnboundedReceiver<RenderState>,
    }

    fn spawn_actor() -> Harness {
        let (ui_tx, ui_rx) = mpsc::unbounded_channel();
        let (resp_tx, resp_rx) = mpsc::unbounded_channel();
        let (cmd_tx, cmd_rx) = mpsc::unbounded_channel();
        let (render_tx, render_rx) = mpsc::unbounded_channel();
        let actor = AppActor::new(AppState::default(), cmd_tx, render_tx);
        tokio::spawn(actor.run(ui_rx, resp_rx));
        Harness {
            ui_tx,
            resp_tx,
            cmd_rx,
            render_rx,
        }
    }

    #[tokio::test]
    async fn test_startup_fetches_and_renders_list() {
        let mut h = spawn_actor();

        let Some(NetworkCommand::FetchQuestions { id }) = h.cmd_rx.recv().await else {
            panic!("expected initial fetch");
        };
        let first = h.render_rx.recv().await.unwrap();
        assert_eq!(first.view, View::List);
        assert!(first.is_loading);

        h.resp_tx
            .send(NetworkResponse::QuestionsLoaded {
                id,
                questions: vec![Question {
                    id: QuestionId::Number(1),
                    prompt: "lorem testum 1".into(),
                    answers: vec!["a".into(), "b".into()],
                    correct_index: Some(1),
                }],
            })
            .unwrap();
        let loaded = h.render_rx.recv().await.unwrap();
        assert_eq!(loaded.questions.len(), 1);
        assert!(!loaded.is_loading);
    }

    #[tokio::test]
    async fn test_quit_shuts_down_network() {
        let mut h = spawn_actor();
        let _ = h.cmd_rx.recv().await;

        h.ui_tx.send(UiEvent::SwitchView(View::Form)).unwrap();
        h.ui_tx.send(UiEvent::Quit).unwrap();
        assert_eq!(h.cmd_rx.recv().await, Some(NetworkCommand::Shutdown));
    }
}
