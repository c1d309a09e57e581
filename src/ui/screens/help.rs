use ratatui::{
    layout::Rect,
    widgets::{Block, Borders, Paragraph},
    Frame,
};

pub fn render(frame: &mut Frame, area: Rect) {
    let text = "\
Action list
  ↑/k ↓/j     move the cursor
  a           add an action
  e / Enter   edit the selected action
  d           delete (with confirmation)
  Space       enable / disable
  t           run the server-side test for one action
  x           execute all actions (with confirmation)
  m           grab / drop for reordering, Esc cancels
  r           reload the list from the server
  q           quit

Editor
  Tab/↓ ↑     move between fields
  ◂ ▸         change kind, cycle selects, pick NPM certificate
  Space       toggle checkboxes
  Enter       validate and save
  Esc         close (asks when there are unsaved changes)
  Ctrl-T      NPM: test the connection
  Ctrl-R      NPM: request a token with your credentials

Press Esc to go back.";

    let paragraph =
        Paragraph::new(text).block(Block::default().borders(Borders::ALL).title("Help"));
    frame.render_widget(paragraph, area);
}
