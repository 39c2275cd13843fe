use crate::dates::{format_display_date, parse_date_key};
use crate::models::{DayRow, StateResponse};

pub fn render_index(view: &StateResponse) -> String {
    INDEX_HTML
        .replace("{{TODAY}}", &view.today_display)
        .replace("{{WEEK_START}}", &view.week_start_display)
        .replace("{{WEEK_LABEL}}", view.week_starts_on.label())
        .replace("{{DEMANDAS_HOJE}}", &view.today_record.demandas.to_string())
        .replace("{{ACESSOS_HOJE}}", &view.today_record.acessos.to_string())
        .replace("{{DEMANDAS_SEMANA}}", &view.week_totals.demandas.to_string())
        .replace("{{ACESSOS_SEMANA}}", &view.week_totals.acessos.to_string())
        .replace("{{WEEK_ROWS}}", &render_rows(&view.week_rows))
}

fn render_rows(rows: &[DayRow]) -> String {
    rows.iter()
        .map(|row| {
            let date = parse_date_key(&row.data)
                .map(format_display_date)
                .unwrap_or_else(|| row.data.clone());
            format!(
                "<tr><td>{date}</td><td class=\"num\">{}</td><td class=\"num\">{}</td></tr>",
                row.demandas, row.acessos
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html lang="pt-BR">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>Contador DETRAN-SP</title>
  <style>
    :root {
      --blue: #1e3a8a;
      --blue-dark: #172554;
      --blue-soft: #eff6ff;
      --yellow: #facc15;
      --ink: #1e293b;
      --muted: #64748b;
      --card: rgba(255, 255, 255, 0.95);
    }

    * {
      box-sizing: border-box;
    }

    body {
      margin: 0;
      min-height: 100vh;
      background: linear-gradient(180deg, var(--blue-soft), white);
      color: var(--ink);
      font-family: system-ui, "Segoe UI", sans-serif;
    }

    header {
      position: sticky;
      top: 0;
      background: var(--blue);
      color: white;
      padding: 12px 16px;
      display: flex;
      flex-wrap: wrap;
      gap: 12px;
      align-items: center;
      justify-content: space-between;
    }

    header h1 {
      margin: 0;
      font-size: 1.25rem;
    }

    header p {
      margin: 0;
      font-size: 0.75rem;
      opacity: 0.9;
    }

    .toolbar {
      display: flex;
      gap: 8px;
      flex-wrap: wrap;
    }

    .toolbar button,
    .toolbar a {
      font-size: 0.8rem;
      padding: 6px 12px;
      border-radius: 8px;
      border: 1px solid rgba(255, 255, 255, 0.25);
      background: rgba(255, 255, 255, 0.1);
      color: white;
      text-decoration: none;
      cursor: pointer;
    }

    .toolbar .primary {
      background: var(--yellow);
      color: var(--blue-dark);
      font-weight: 600;
    }

    main {
      max-width: 960px;
      margin: 0 auto;
      padding: 24px 16px;
      display: grid;
      gap: 20px;
    }

    .pills {
      display: flex;
      gap: 8px;
      flex-wrap: wrap;
    }

    .pill {
      padding: 4px 10px;
      border-radius: 999px;
      font-size: 0.75rem;
      background: #fef9c3;
      color: #854d0e;
      border: 1px solid #fef08a;
    }

    .cards {
      display: grid;
      grid-template-columns: repeat(auto-fit, minmax(280px, 1fr));
      gap: 20px;
    }

    .card {
      background: var(--card);
      border: 1px solid #dbeafe;
      border-radius: 16px;
      box-shadow: 0 10px 30px rgba(30, 58, 138, 0.08);
      padding: 16px 20px;
    }

    .card h3 {
      margin: 0 0 12px;
      color: var(--blue);
    }

    .stats {
      display: grid;
      grid-template-columns: 1fr 1fr;
      gap: 16px;
    }

    .stat .label {
      font-size: 0.85rem;
      color: var(--muted);
    }

    .stat .value {
      display: block;
      font-size: 2rem;
      font-weight: 700;
      color: var(--blue-dark);
    }

    .stepper {
      margin-top: 12px;
      display: flex;
      flex-wrap: wrap;
      gap: 8px;
    }

    .stepper form {
      margin: 0;
    }

    .stepper button,
    .resets button {
      padding: 8px 12px;
      border-radius: 12px;
      border: 1px solid #bfdbfe;
      background: var(--blue-soft);
      color: var(--blue-dark);
      cursor: pointer;
    }

    .stepper button.minus {
      background: white;
      border-color: #e2e8f0;
      color: #334155;
    }

    table {
      width: 100%;
      border-collapse: collapse;
      font-size: 0.9rem;
    }

    th {
      text-align: left;
      color: var(--blue);
      padding: 8px 12px 8px 0;
    }

    td {
      border-top: 1px solid #f1f5f9;
      padding: 8px 12px 8px 0;
    }

    td.num {
      font-weight: 600;
    }

    .resets {
      margin-top: 16px;
      display: flex;
      gap: 12px;
    }

    .resets .danger {
      background: #fef2f2;
      border-color: #fecaca;
      color: #b91c1c;
    }

    .hint {
      font-size: 0.75rem;
      color: var(--muted);
    }
  </style>
</head>
<body>
  <header>
    <div>
      <h1>Contador DETRAN-SP</h1>
      <p>Demandas do dia, semana e acessos resetados</p>
    </div>
    <div class="toolbar">
      <button type="button" id="toggle-week" title="Alternar início da semana (Segunda/Domingo)">Semana começa: <span id="week-label">{{WEEK_LABEL}}</span></button>
      <a class="primary" href="/export/week.csv">Exportar Semana (CSV)</a>
      <a href="/export/all.csv">Exportar Tudo (CSV)</a>
    </div>
  </header>

  <main>
    <div class="pills">
      <span class="pill">Hoje: <span id="today">{{TODAY}}</span></span>
      <span class="pill">Semana atual: <span id="week-start">{{WEEK_START}}</span> → <span id="today-2">{{TODAY}}</span></span>
      <span class="pill">Fuso: São Paulo</span>
    </div>

    <section class="cards">
      <div class="card">
        <h3>Demandas</h3>
        <div class="stats">
          <div class="stat"><span class="label">Hoje</span><span class="value" id="demandas-hoje">{{DEMANDAS_HOJE}}</span></div>
          <div class="stat"><span class="label">Semana</span><span class="value" id="demandas-semana">{{DEMANDAS_SEMANA}}</span></div>
        </div>
        <div class="stepper" data-field="demandas">
          <form method="post" action="/update"><input type="hidden" name="field" value="demandas" /><input type="hidden" name="delta" value="1" /><button type="submit">+1</button></form>
          <form method="post" action="/update"><input type="hidden" name="field" value="demandas" /><input type="hidden" name="delta" value="5" /><button type="submit">+5</button></form>
          <form method="post" action="/update"><input type="hidden" name="field" value="demandas" /><input type="hidden" name="delta" value="10" /><button type="submit">+10</button></form>
          <form method="post" action="/update"><input type="hidden" name="field" value="demandas" /><input type="hidden" name="delta" value="-1" /><button class="minus" type="submit">-1</button></form>
        </div>
      </div>

      <div class="card">
        <h3>Acessos resetados</h3>
        <div class="stats">
          <div class="stat"><span class="label">Hoje</span><span class="value" id="acessos-hoje">{{ACESSOS_HOJE}}</span></div>
          <div class="stat"><span class="label">Semana</span><span class="value" id="acessos-semana">{{ACESSOS_SEMANA}}</span></div>
        </div>
        <div class="stepper" data-field="acessos">
          <form method="post" action="/update"><input type="hidden" name="field" value="acessos" /><input type="hidden" name="delta" value="1" /><button type="submit">+1</button></form>
          <form method="post" action="/update"><input type="hidden" name="field" value="acessos" /><input type="hidden" name="delta" value="5" /><button type="submit">+5</button></form>
          <form method="post" action="/update"><input type="hidden" name="field" value="acessos" /><input type="hidden" name="delta" value="10" /><button type="submit">+10</button></form>
          <form method="post" action="/update"><input type="hidden" name="field" value="acessos" /><input type="hidden" name="delta" value="-1" /><button class="minus" type="submit">-1</button></form>
        </div>
      </div>
    </section>

    <section class="card">
      <h3>Histórico da semana (dia a dia)</h3>
      <table>
        <thead>
          <tr><th>Data</th><th>Demandas</th><th>Acessos resetados</th></tr>
        </thead>
        <tbody id="week-rows">
{{WEEK_ROWS}}
        </tbody>
      </table>
      <div class="resets">
        <button type="button" id="reset-today">Zerar Hoje</button>
        <button type="button" class="danger" id="reset-week">Zerar Semana (até hoje)</button>
      </div>
    </section>

    <p class="hint">Os dados ficam salvos neste computador. Use "Exportar" para salvar CSV.</p>
  </main>

  <script>
    const byId = (id) => document.getElementById(id);

    const displayDate = (key) => {
      const [y, m, d] = key.split('-');
      return `${d}/${m}/${y}`;
    };

    const render = (view) => {
      byId('today').textContent = view.today_display;
      byId('today-2').textContent = view.today_display;
      byId('week-start').textContent = view.week_start_display;
      byId('week-label').textContent = view.week_starts_on === 1 ? 'Seg' : 'Dom';
      byId('demandas-hoje').textContent = view.today_record.demandas;
      byId('acessos-hoje').textContent = view.today_record.acessos;
      byId('demandas-semana').textContent = view.week_totals.demandas;
      byId('acessos-semana').textContent = view.week_totals.acessos;
      byId('week-rows').innerHTML = view.week_rows
        .map((row) => `<tr><td>${displayDate(row.data)}</td><td class="num">${row.demandas}</td><td class="num">${row.acessos}</td></tr>`)
        .join('');
    };

    const post = async (url, body) => {
      const res = await fetch(url, {
        method: 'POST',
        headers: body ? { 'content-type': 'application/json' } : {},
        body: body ? JSON.stringify(body) : undefined
      });
      if (!res.ok) {
        throw new Error((await res.text()) || 'Request failed');
      }
      render(await res.json());
    };

    document.querySelectorAll('.stepper form').forEach((form) => {
      form.addEventListener('submit', (event) => {
        event.preventDefault();
        const data = new FormData(form);
        post('/api/update', { field: data.get('field'), delta: Number(data.get('delta')) })
          .catch((err) => console.error(err));
      });
    });

    byId('reset-today').addEventListener('click', () => post('/api/reset/today').catch(console.error));
    byId('reset-week').addEventListener('click', () => post('/api/reset/week').catch(console.error));
    byId('toggle-week').addEventListener('click', () => post('/api/settings/toggle-week-start').catch(console.error));

    setInterval(() => {
      fetch('/api/state')
        .then((res) => res.json())
        .then(render)
        .catch(console.error);
    }, 60 * 1000);
  </script>
</body>
</html>
"#;
