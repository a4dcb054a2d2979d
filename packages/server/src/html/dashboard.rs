/// Dashboard page. `{{MAP_WIDTH}}` and `{{MAP_HEIGHT}}` size the map frame.
pub const DASHBOARD_HTML: &str = r##"<!doctype html>
<html lang="ja">

<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>能登3市3町祭りマップ</title>
  <style>
    body { margin: 0; font-family: "Hiragino Sans", "Noto Sans JP", sans-serif; color: #262730; display: flex; min-height: 100vh; }
    aside { width: 300px; flex-shrink: 0; background: #f0f2f6; padding: 24px 16px; box-sizing: border-box; }
    main { flex: 1; padding: 32px 48px; }
    h1 { margin-top: 0; }
    h3 { margin: 16px 0 8px; }
    label.control { display: block; font-size: 14px; margin-bottom: 6px; }
    .towns { max-height: 240px; overflow-y: auto; background: white; border-radius: 6px; padding: 6px 8px; margin-bottom: 16px; }
    .towns label { display: block; font-size: 14px; padding: 2px 0; }
    .months { display: grid; grid-template-columns: auto 1fr auto; gap: 4px 8px; align-items: center; font-size: 14px; }
    .months output { min-width: 2ch; text-align: right; }
    hr { border: none; border-top: 1px solid #d0d3da; margin: 24px 0; }
    input[type=text] { width: 100%; box-sizing: border-box; padding: 6px 8px; border: 1px solid #d0d3da; border-radius: 6px; }
    #player { margin-top: 12px; }
    #player iframe, #player video { width: 100%; aspect-ratio: 16 / 9; border: none; }
    #last-clicked { margin-top: 12px; font-size: 13px; color: #555; word-break: break-all; }
    #map-frame { border: none; }
  </style>
</head>

<body>
  <aside>
    <label class="control">表示する祭りを選択してください</label>
    <div class="towns" id="towns"></div>

    <label class="control">月の範囲を選んでください(0:不明もしくは祭りなし)</label>
    <div class="months">
      <span>開始</span><input type="range" id="start" step="1" /><output id="start-value"></output>
      <span>終了</span><input type="range" id="stop" step="1" /><output id="stop-value"></output>
    </div>

    <hr />
    <h3>🎥 祭り動画</h3>
    <label class="control" for="video-url">URLをコピーしてください</label>
    <input type="text" id="video-url" autocomplete="off" />
    <div id="player"></div>
    <div id="last-clicked"></div>
  </aside>

  <main>
    <h1>能登3市3町祭りマップ</h1>
    <p>〇をクリックし表示されたURLを左下の空欄にコピーしEnterを押すと動画が再生されます</p>
    <iframe id="map-frame" width="{{MAP_WIDTH}}" height="{{MAP_HEIGHT}}" title="map"></iframe>
  </main>

  <script>
    (function () {
      const townsEl = document.getElementById('towns');
      const startEl = document.getElementById('start');
      const stopEl = document.getElementById('stop');
      const frame = document.getElementById('map-frame');
      const player = document.getElementById('player');
      const lastClicked = document.getElementById('last-clicked');

      function refreshMap() {
        const towns = Array.from(townsEl.querySelectorAll('input:checked')).map((el) => el.value);
        const params = new URLSearchParams({
          towns: towns.join(','),
          start: startEl.value,
          stop: stopEl.value
        });
        document.getElementById('start-value').textContent = startEl.value;
        document.getElementById('stop-value').textContent = stopEl.value;
        frame.src = '/map?' + params.toString();
      }

      function clampMonths(changed) {
        if (Number(startEl.value) > Number(stopEl.value)) {
          if (changed === startEl) stopEl.value = startEl.value;
          else startEl.value = stopEl.value;
        }
        refreshMap();
      }

      function showVideo(video) {
        player.replaceChildren();
        if (video.kind === 'youtube') {
          const iframe = document.createElement('iframe');
          iframe.src = video.embedUrl;
          iframe.allow = 'accelerometer; autoplay; encrypted-media; picture-in-picture';
          iframe.allowFullscreen = true;
          player.appendChild(iframe);
        } else if (video.kind === 'file') {
          const el = document.createElement('video');
          el.src = video.src;
          el.controls = true;
          player.appendChild(el);
        } else if (video.kind === 'link') {
          const a = document.createElement('a');
          a.href = video.url;
          a.target = '_blank';
          a.rel = 'noopener';
          a.textContent = video.url;
          player.appendChild(a);
        }
      }

      fetch('/api/options')
        .then((res) => res.json())
        .then((options) => {
          options.towns.forEach((town) => {
            const label = document.createElement('label');
            const box = document.createElement('input');
            box.type = 'checkbox';
            box.value = String(town.index);
            box.checked = true;
            box.addEventListener('change', refreshMap);
            label.appendChild(box);
            label.appendChild(document.createTextNode(' ' + town.label));
            townsEl.appendChild(label);
          });

          [startEl, stopEl].forEach((el) => {
            el.min = options.monthMin;
            el.max = options.monthMax;
            el.addEventListener('input', () => clampMonths(el));
          });
          startEl.value = options.defaultStart;
          stopEl.value = options.defaultStop;
          refreshMap();
        })
        .catch((err) => console.error('Failed to load options', err));

      document.getElementById('video-url').addEventListener('keydown', (e) => {
        if (e.key !== 'Enter') return;
        fetch('/api/video?url=' + encodeURIComponent(e.target.value))
          .then((res) => res.json())
          .then(showVideo)
          .catch((err) => console.error('Failed to resolve video', err));
      });

      window.addEventListener('message', (e) => {
        const msg = e.data;
        if (!msg || msg.type !== 'festival-map:click') return;
        lastClicked.textContent = [msg.tooltip, msg.popup].filter(Boolean).join(' ');
      });
    })();
  </script>
</body>

</html>
"##;
