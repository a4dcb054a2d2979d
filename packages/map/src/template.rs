//! Standalone Leaflet page the map document renders into.
//!
//! `{{HEAD_STYLES}}` receives the injected `<style>` blocks and
//! `{{MAP_DATA}}` the serialized [`crate::MapDocument`].

pub const MAP_TEMPLATE: &str = r##"<!doctype html>
<html lang="ja">

<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />

  <!-- Leaflet 1.9.4 -->
  <link rel="stylesheet" href="https://cdnjs.cloudflare.com/ajax/libs/leaflet/1.9.4/leaflet.css" crossorigin="anonymous" />
  <script src="https://cdnjs.cloudflare.com/ajax/libs/leaflet/1.9.4/leaflet.js" crossorigin="anonymous"></script>

  <style>
    html, body { margin: 0; padding: 0; width: 100%; height: 100%; }
    #map { position: absolute; inset: 0; }
    .legend { font: 12px sans-serif; line-height: 16px; }
    .legend .swatches { display: flex; }
    .legend .swatch { width: 36px; height: 10px; }
    .legend .ticks { display: flex; justify-content: space-between; }
  </style>
  {{HEAD_STYLES}}
</head>

<body>
  <div id="map"></div>
  <script>
    (function () {
      const data = {{MAP_DATA}};

      const map = L.map('map', { center: [data.center.lat, data.center.lng], zoom: data.zoom });
      L.tileLayer('https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png', {
        maxZoom: 18,
        attribution: '&copy; OpenStreetMap contributors'
      }).addTo(map);

      const text = (value) => {
        const span = document.createElement('span');
        span.textContent = value;
        return span;
      };

      if (data.choropleth) {
        const layer = data.choropleth;
        L.geoJSON(layer.features, {
          style: (feature) => ({
            fillColor: feature.properties.fillColor,
            fillOpacity: layer.style.fillOpacity,
            weight: layer.style.lineWeight,
            opacity: layer.style.lineOpacity,
            color: layer.style.lineColor
          })
        }).addTo(map);

        const legend = L.control({ position: 'topright' });
        legend.onAdd = () => {
          const div = L.DomUtil.create('div', 'legend');
          const swatches = L.DomUtil.create('div', 'swatches', div);
          layer.scale.colors.forEach((color) => {
            L.DomUtil.create('div', 'swatch', swatches).style.background = color;
          });
          const ticks = L.DomUtil.create('div', 'ticks', div);
          layer.scale.thresholds
            .filter((_, i) => i % 2 === 0)
            .forEach((t) => ticks.appendChild(text(t.toFixed(1))));
          div.appendChild(text(layer.style.legendName));
          return div;
        };
        legend.addTo(map);
      }

      data.markers.forEach((m) => {
        const marker = L.circleMarker([m.lat, m.lng], {
          radius: m.radius,
          color: m.color,
          fill: true,
          fillColor: m.color,
          fillOpacity: m.fillOpacity,
          weight: m.weight
        }).addTo(map);

        if (m.tooltip) marker.bindTooltip(text(m.tooltip));
        if (m.popup) marker.bindPopup(text(m.popup));

        marker.on('click', () => {
          if (window.parent && window.parent !== window) {
            window.parent.postMessage({
              type: 'festival-map:click',
              lat: m.lat,
              lng: m.lng,
              festivalType: m.type,
              tooltip: m.tooltip,
              popup: m.popup
            }, '*');
          }
        });
      });
    })();
  </script>
</body>

</html>
"##;
