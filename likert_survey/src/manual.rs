/*!

This is the long-form manual for `likert_survey` and `likertsheet`.

## Running

```bash
likertsheet --config survey.json --out responses.csv --summary stdout
```

Options:
* `--config` the configuration file (mandatory)
* `--input`, `--input-type` read the responses from this file instead of the sources of the
  configuration. The path is relative to the current directory. The type defaults to `json`.
* `--excel-worksheet-name` the worksheet to read, for `msforms` inputs
* `--out` the sheet that receives the rows. Overrides `outputSettings.sheetPath`.
* `--chart-dir` where to write one radar chart per response. Overrides `outputSettings.chartDirectory`.
* `--summary` where to write the summary (a file, or `stdout`)
* `--reference` a summary to compare against. The program fails if they differ.
* `--dry-run` checks and reports everything, but does not touch the sheet
* `--verbose` more logging. The `RUST_LOG` variable is also honored.

## Configuration

The configuration is a JSON file. Paths are relative to the directory of the configuration file.

```json
{
  "outputSettings": {
    "surveyName": "Personality Check-in",
    "sheetPath": "responses.csv",
    "chartDirectory": "charts",
    "chartTitle": "Big Five",
    "writeHeader": true
  },
  "scale": { "preset": "numeric7" },
  "demographics": [
    { "name": "age", "kind": "number" },
    { "name": "country", "kind": "text" }
  ],
  "items": [
    { "trait": "Openness", "statement": "I have a vivid imagination." },
    { "trait": "Extraversion", "statement": "I am the life of the party." },
    { "statement": "I answered honestly." }
  ],
  "responseSources": [
    { "provider": "csv", "filePath": "responses_export.csv" }
  ]
}
```

### Scale

Either a `preset` or a list of `labels`, from the lowest to the highest value.
The labels get the values 1, 2, ... N.

Presets:
* `agreement5`: `Strongly Disagree`, `Disagree`, `Neutral`, `Agree`, `Strongly Agree`
* `numeric7`: `1 (Strongly Disagree)`, `2`, `3`, `4 (Neither)`, `5`, `6`, `7 (Strongly Agree)`

With `labels`, the `encoding` tells how a selected label becomes a value:
* `exact` (default): the label must be one of the labels, character for character
* `numericPrefix`: the value is the number that starts the label. `"6"`, `"6 (Agree)"` and
  `"6(Agree)"` are all read as 6.

### Items

Either `"itemPreset": "nationalIdentity"` or a list of `items`. Each item is a `statement`
and an optional `trait`. The statements are the names of the columns, in this order,
so they must be unique. The items without a trait are recorded but not averaged.

### Demographics

Fields asked before the statements. A field of kind `number` is written as a number in the
sheet, and may have inclusive `min` and `max` bounds. A `default` replaces an empty or absent
answer. Without a default, an empty answer is written as an empty cell.

```json
{ "name": "Age", "kind": "number", "min": 10, "max": 100, "default": 25 }
```

## Input formats

Responses are matched to the statements by the text of the statement. Extra fields are ignored.

### `json`

A list of responses:

```json
[
  {
    "id": "alice",
    "timestamp": "2024-03-01 10:00:00",
    "demographics": { "age": 25, "country": "USA" },
    "answers": { "I have a vivid imagination.": "6" }
  }
]
```

`id` and `timestamp` are optional.

### `csv`

A CSV export from a form, with a header line. Each statement must have a column.
The timestamp is read from the `Timestamp` column, unless `timestampColumn` is given in
the source. An `idColumn` may name the column holding the identifier of the response.
Empty lines are skipped.

### `msforms`

An Excel (.xlsx) export from Microsoft Forms. Same rules as `csv`. The timestamp defaults
to the `Completion time` column and the identifier to the `ID` column.
Set `excelWorksheetName` if the workbook has more than one worksheet.

## Output

### The sheet

One row per response: the timestamp, the demographic fields in the order of the configuration,
then the value of each statement in the order of the items.

The first row of the sheet must be the header. If the sheet is empty, the header is written.
If the sheet already has a different header, nothing is written: the columns would not line up.
With `"writeHeader": false` the sheet has no header at all, and the column order is not checked.

Every response is checked before the first row is appended. A response with a missing answer
or an unknown label stops the run without changing the sheet.

Responses without a timestamp are stamped with the time of the run, as `YYYY-MM-DD HH:MM:SS`.

### Radar charts

When the items have at least 3 traits, each response gets a SVG radar chart of its trait
averages, with one axis per trait. The file is named after the response identifier; when two
identifiers give the same file name, the later ones get a `-2`, `-3`... suffix.

### Summary

A JSON document with the rows, the trait averages of each response, the radar polygons
(angles in degrees), and the average of each trait over all the responses.
*/
