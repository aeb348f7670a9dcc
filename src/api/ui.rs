//! The single page UI.

pub const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>LangChain Knowledge Center</title>
<style>
  body { margin: 0; font-family: system-ui, sans-serif; color: #262730; display: flex; min-height: 100vh; }
  aside { width: 280px; background: #f5f5f5; padding: 24px; box-sizing: border-box; }
  aside h1 { font-size: 1.4rem; }
  aside li { margin-bottom: 8px; }
  main { flex: 1; padding: 32px 48px; max-width: 960px; }
  label { display: block; margin-bottom: 6px; }
  input[type=text] { width: 100%; padding: 10px; font-size: 1rem; box-sizing: border-box; border: 1px solid #ccc; border-radius: 6px; }
  button { margin-top: 12px; padding: 8px 20px; font-size: 1rem; border-radius: 6px; border: 1px solid #ccc; background: #fff; cursor: pointer; }
  button:disabled { cursor: wait; opacity: 0.6; }
  .panel { margin-top: 20px; padding: 14px 16px; border-radius: 6px; }
  .success { background: #dff5e3; color: #1b5e20; }
  .warning { background: #fff6d6; color: #7a5b00; }
  .error { background: #fde2e2; color: #8a1c1c; }
  .answer { white-space: pre-wrap; margin-top: 12px; }
  pre { background: #f7f7f9; padding: 12px; overflow-x: auto; font-size: 0.85rem; }
  footer { text-align: center; margin-top: 48px; color: #666; }
  [hidden] { display: none; }
</style>
</head>
<body>
<aside>
  <h1>About LangChain</h1>
  <p>LangChain is a powerful tool for building AI-powered applications.</p>
  <p>This demo showcases how LangChain can be used to create a knowledge center.</p>
  <h2>Tools</h2>
  <ul id="tools"></ul>
  <p id="index-info"></p>
</aside>
<main>
  <h1>LangChain Knowledge Center</h1>
  <form id="ask-form">
    <label for="question">Ask a question:</label>
    <input type="text" id="question" name="question" placeholder="Type Here..." autocomplete="off">
    <button type="submit" id="submit">Submit</button>
  </form>
  <div id="result" class="panel" hidden>
    <strong id="result-title"></strong>
    <div id="answer" class="answer"></div>
    <details id="turn-details" hidden>
      <summary>Agent turn</summary>
      <pre id="turn"></pre>
    </details>
  </div>
  <footer><p><i>Powered by LangChain</i></p></footer>
</main>
<script>
  const form = document.getElementById('ask-form');
  const button = document.getElementById('submit');
  const result = document.getElementById('result');
  const title = document.getElementById('result-title');
  const answer = document.getElementById('answer');
  const details = document.getElementById('turn-details');
  const turn = document.getElementById('turn');

  function show(kind, heading, text, raw) {
    result.className = 'panel ' + kind;
    title.textContent = heading;
    answer.textContent = text || '';
    details.hidden = !raw;
    turn.textContent = raw ? JSON.stringify(raw, null, 2) : '';
    result.hidden = false;
  }

  form.addEventListener('submit', async (event) => {
    event.preventDefault();
    button.disabled = true;
    show('warning', 'Thinking...', '', null);
    try {
      const response = await fetch('/api/ask', {
        method: 'POST',
        headers: { 'Content-Type': 'application/json' },
        body: JSON.stringify({ question: document.getElementById('question').value }),
      });
      const body = await response.json();
      if (body.status === 'success') {
        show('success', 'Response:', body.turn.answer, body.turn);
      } else if (body.status === 'warning') {
        show('warning', body.message, '', null);
      } else {
        show('error', body.message || 'Request failed.', '', null);
      }
    } catch (err) {
      show('error', 'Request failed: ' + err, '', null);
    } finally {
      button.disabled = false;
    }
  });

  fetch('/api/tools').then((r) => r.json()).then((tools) => {
    const list = document.getElementById('tools');
    for (const tool of tools) {
      const item = document.createElement('li');
      item.innerHTML = '<code></code> ';
      item.firstChild.textContent = tool.name;
      item.append(tool.description);
      list.appendChild(item);
    }
  }).catch(() => {});

  fetch('/api/health').then((r) => r.json()).then((health) => {
    document.getElementById('index-info').textContent =
      health.chunks + ' chunks indexed from ' + health.source;
  }).catch(() => {});
</script>
</body>
</html>
"#;
