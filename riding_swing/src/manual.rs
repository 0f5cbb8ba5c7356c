/*!

This is the long-form manual for `riding_swing` and `ridingmap`.

## Input formats

### Results table (`text`)

One riding per line, comma separated, no header:

```text
Toronto Centre,45.2%,20.1%,25.3%,5.0%,0%,4.4%,0%,...
```

The first field is the riding name. It is followed by the vote shares of every
tracked party (LPC, CPC, NDP, GRN, BLOC, PPC, IND by default) for every tracked
year, most recent year first: the first 7 shares are the most recent election,
the next 7 the one before, and so on. With the default configuration a line
has exactly 22 fields.

Shares are percentages. The trailing `%` is optional. Lines without even one
year of shares (8 fields with the default parties), with the wrong number of
fields, or with any share that is not a number are skipped entirely. When two lines carry the same riding name, the last one
is kept.

### Results workbook (`xlsx`)

The same layout in the first worksheet of an Excel workbook (or the worksheet
given with `--excel-worksheet-name`), one riding per row, without a header row.
Numeric cells are read as percentages.

### Map

An SVG document. Every element below the root that carries a `data-riding`
attribute is a riding. Its `fill` attribute is overwritten with the colour of
the projected winner, as `#rrggbb`.

Riding names in both sources are compared after replacing all the dash variants
(em dash, en dash, minus sign, and the em dash mis-decoded as `â€”`) by `-`.
Elements without results, and results without elements, are ignored.

## Projection

For a year slice, the national average of a party is the mean of its shares over
the ridings where it has a nonzero share. With a national target `t` and a
national average `a`, every riding share `s` of that party becomes
`s * t / a`. Parties without a target are targeted at 0, and parties with an
average of 0 are projected at 0. The shares are not renormalized.

The winner is the party with the largest projected share (ties go to the party
listed first). The margin is the gap with the second party, or 0 if only one
party has a share. Narrow margins lighten the colour of the winner toward white:
by 50% under 5 points and by 30% under 10 points.

When several years are requested with `--blend`, the projections of each year
are combined party by party with the year weights (0.50, 0.333, 0.167 by
default, most recent first) before picking the winner.

## Configuration

All the options above can be given in a JSON file with `--config`:

```json
{
  "outputSettings": { "outputPattern": "CMHoCToronto_Map{year}.svg", "writeEachElement": true },
  "sources": { "resultsFile": "results.txt", "provider": "text", "mapFile": "CMHoCToronto.svg" },
  "parties": [
    { "code": "LPC", "color": "#ff0000", "prompt": true },
    { "code": "CPC", "color": "#0000ff", "prompt": true }
  ],
  "othersColor": "#d3d3d3",
  "rules": { "numYears": 3, "yearWeights": [0.5, 0.333, 0.167], "yearIndexes": [0] },
  "targets": { "LPC": 40, "CPC": 30 }
}
```

Relative paths are resolved from the directory of the configuration file. When
no targets are given, the program asks for the percentage of every party marked
with `prompt`.

*/
